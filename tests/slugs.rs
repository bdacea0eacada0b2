use poke_sight::arena::Arena;
use poke_sight::artwork::ArtworkConfig;
use poke_sight::slug::normalize;

#[test]
fn display_names_map_to_artwork_slugs() {
    let cases = [
        ("Bulbasaur", "bulbasaur"),
        ("Mega Charizard X", "charizard-mega-x"),
        ("Mega Venusaur", "venusaur-mega"),
        ("Zygarde Half Forme", "zygarde-50"),
        ("Zygarde Complete Forme", "zygarde-100"),
        ("Zygarde 10% Forme", "zygarde-10"),
        ("Deoxys Attack Forme", "deoxys-attack"),
        ("Primal Kyogre", "kyogre-primal"),
        ("Mr. Mime", "mr-mime"),
        ("Mime Jr.", "mime-jr"),
        ("Wormadam Plant Cloak", "wormadam-plant"),
        ("Heat Rotom", "rotom-heat"),
        ("Pumpkaboo Average Size", "pumpkaboo"),
        ("Darmanitan Zen Mode", "darmanitan-zen"),
        ("Kyurem Black Kyurem", "kyurem-black"),
        ("Nidoran♀", "nidoran-f"),
        ("Nidoran♂", "nidoran-m"),
        ("Farfetch'd", "farfetchd"),
        ("Flabébé", "flabebe"),
        ("Tapu Koko", "tapu-koko"),
        ("", ""),
    ];
    for (name, slug) in cases {
        assert_eq!(normalize(name), slug, "{name:?}");
    }
}

#[test]
fn every_dex_name_produces_a_clean_slug() {
    let arena = Arena::embedded().unwrap();
    for name in arena.dex().names() {
        let slug = normalize(name);
        assert!(!slug.is_empty(), "{name} produced an empty slug");
        assert!(
            slug.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "{name} -> {slug}"
        );
    }
}

#[test]
fn custom_artwork_source_is_respected() {
    let artwork = ArtworkConfig {
        base_url: "https://cdn.example.test/art".to_string(),
        format: "normal".to_string(),
        ext: "png".to_string(),
    };
    assert_eq!(
        artwork.url_for_name("Mega Charizard Y"),
        "https://cdn.example.test/art/normal/charizard-mega-y.png"
    );
}
