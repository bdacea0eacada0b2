use crate::slug;

/// Where artwork lives: `<base_url>/<format>/<slug>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkConfig {
    pub base_url: String,
    pub format: String,
    pub ext: String,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            base_url: "https://img.pokemondb.net/artwork".to_string(),
            format: "large".to_string(),
            ext: "jpg".to_string(),
        }
    }
}

impl ArtworkConfig {
    pub fn url_for_slug(&self, slug: &str) -> String {
        format!("{}/{}/{}.{}", self.base_url, self.format, slug, self.ext)
    }

    pub fn url_for_name(&self, display_name: &str) -> String {
        self.url_for_slug(&slug::normalize(display_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_matches_pokemondb() {
        let cfg = ArtworkConfig::default();
        assert_eq!(
            cfg.url_for_name("Mega Charizard X"),
            "https://img.pokemondb.net/artwork/large/charizard-mega-x.jpg"
        );
    }

    #[test]
    fn custom_host_and_extension() {
        let cfg = ArtworkConfig {
            base_url: "http://localhost:8080/art".to_string(),
            format: "small".to_string(),
            ext: "png".to_string(),
        };
        assert_eq!(
            cfg.url_for_name("Nidoran♀"),
            "http://localhost:8080/art/small/nidoran-f.png"
        );
    }
}
