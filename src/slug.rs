/// Maps a Pokédex display name to the slug the artwork host uses for it.
///
/// Names are trimmed, lowercased and split on whitespace first; every special
/// character check below runs on the lowercased text. Multi-word names go
/// through `MULTI_WORD_RULES` in order (first match wins) and fall back to
/// the hyphen-joined tokens. Never fails: empty input yields an empty slug.
pub fn normalize(display_name: &str) -> String {
    let lowered = display_name.trim().to_lowercase();
    let tokens = lowered.split_whitespace().collect::<Vec<_>>();

    match tokens.as_slice() {
        [] => String::new(),
        [word] => single_word_slug(word),
        [first, second, rest @ ..] => {
            let words = Words {
                first: *first,
                second: *second,
                rest,
                last: tokens.last().copied().unwrap_or(*second),
            };
            MULTI_WORD_RULES
                .iter()
                .find(|rule| rule.matches(&words))
                .map(|rule| rule.apply(&words))
                .unwrap_or_else(|| tokens.join("-"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MultiWordRule {
    Mega,
    Zygarde,
    Forme,
    Primal,
    MrTitle,
    JrTitle,
    Wormadam,
    Rotom,
    Size,
    Mode,
    Kyurem,
}

const MULTI_WORD_RULES: [MultiWordRule; 11] = [
    MultiWordRule::Mega,
    MultiWordRule::Zygarde,
    MultiWordRule::Forme,
    MultiWordRule::Primal,
    MultiWordRule::MrTitle,
    MultiWordRule::JrTitle,
    MultiWordRule::Wormadam,
    MultiWordRule::Rotom,
    MultiWordRule::Size,
    MultiWordRule::Mode,
    MultiWordRule::Kyurem,
];

struct Words<'a> {
    first: &'a str,
    second: &'a str,
    rest: &'a [&'a str],
    last: &'a str,
}

impl MultiWordRule {
    fn matches(self, w: &Words<'_>) -> bool {
        match self {
            MultiWordRule::Mega => w.first == "mega",
            MultiWordRule::Zygarde => w.first == "zygarde",
            MultiWordRule::Forme => w.last == "forme",
            MultiWordRule::Primal => w.first == "primal",
            MultiWordRule::MrTitle => w.first == "mr.",
            MultiWordRule::JrTitle => w.second == "jr.",
            MultiWordRule::Wormadam => w.first == "wormadam",
            MultiWordRule::Rotom => w.last == "rotom",
            MultiWordRule::Size => w.last == "size",
            MultiWordRule::Mode => w.last == "mode",
            MultiWordRule::Kyurem => w.last == "kyurem",
        }
    }

    fn apply(self, w: &Words<'_>) -> String {
        match self {
            MultiWordRule::Mega => {
                if w.rest.is_empty() {
                    format!("{}-mega", w.second)
                } else {
                    format!("{}-mega-{}", w.second, w.rest.join("-"))
                }
            }
            MultiWordRule::Zygarde => {
                let percent = match w.second {
                    "half" => "50",
                    "complete" => "100",
                    _ => "10",
                };
                format!("{}-{percent}", w.first)
            }
            MultiWordRule::Primal | MultiWordRule::Rotom => format!("{}-{}", w.second, w.first),
            MultiWordRule::MrTitle => format!("{}-{}", w.first.replace('.', ""), w.second),
            MultiWordRule::JrTitle => format!("{}-{}", w.first, w.second.replace('.', "")),
            MultiWordRule::Size => w.first.to_string(),
            MultiWordRule::Forme
            | MultiWordRule::Wormadam
            | MultiWordRule::Mode
            | MultiWordRule::Kyurem => format!("{}-{}", w.first, w.second),
        }
    }
}

fn single_word_slug(word: &str) -> String {
    if word.contains('♀') {
        word.replace('♀', "-f")
    } else if word.contains('♂') {
        word.replace('♂', "-m")
    } else if word.contains('\'') {
        word.replace('\'', "")
    } else if word.contains('é') {
        word.replace('é', "e")
    } else {
        word.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_lowercased() {
        assert_eq!(normalize("Bulbasaur"), "bulbasaur");
        assert_eq!(normalize("  Squirtle "), "squirtle");
        assert_eq!(normalize("Tapu Koko"), "tapu-koko");
    }

    #[test]
    fn mega_forms_move_the_marker_after_the_species() {
        assert_eq!(normalize("Mega Venusaur"), "venusaur-mega");
        assert_eq!(normalize("Mega Charizard X"), "charizard-mega-x");
        assert_eq!(normalize("Mega Charizard Y"), "charizard-mega-y");
    }

    #[test]
    fn zygarde_has_three_outcomes() {
        assert_eq!(normalize("Zygarde Half Forme"), "zygarde-50");
        assert_eq!(normalize("Zygarde Complete"), "zygarde-100");
        assert_eq!(normalize("Zygarde Half"), "zygarde-50");
        assert_eq!(normalize("Zygarde 10% Forme"), "zygarde-10");
        // A lone token never reaches the multi-word table.
        assert_eq!(normalize("Zygarde"), "zygarde");
    }

    #[test]
    fn forme_and_mode_keep_the_first_two_tokens() {
        assert_eq!(normalize("Deoxys Attack Forme"), "deoxys-attack");
        assert_eq!(normalize("Darmanitan Zen Mode"), "darmanitan-zen");
        assert_eq!(normalize("Wormadam Sandy Cloak"), "wormadam-sandy");
        assert_eq!(normalize("Kyurem Black Kyurem"), "kyurem-black");
    }

    #[test]
    fn swapped_orders() {
        assert_eq!(normalize("Primal Groudon"), "groudon-primal");
        assert_eq!(normalize("Heat Rotom"), "rotom-heat");
    }

    #[test]
    fn titles_lose_their_period() {
        assert_eq!(normalize("Mr. Mime"), "mr-mime");
        assert_eq!(normalize("Mime Jr."), "mime-jr");
    }

    #[test]
    fn size_variants_drop_the_marker() {
        assert_eq!(normalize("Pumpkaboo Average Size"), "pumpkaboo");
        assert_eq!(normalize("Gourgeist Super Size"), "gourgeist");
    }

    #[test]
    fn earlier_rules_win_over_later_ones() {
        // "forme" is checked before "primal".
        assert_eq!(normalize("Primal Test Forme"), "primal-test");
        // "mega" is checked before everything else.
        assert_eq!(normalize("Mega Heat Rotom"), "heat-mega-rotom");
    }

    #[test]
    fn gender_symbols_become_suffixes() {
        assert_eq!(normalize("Nidoran♀"), "nidoran-f");
        assert_eq!(normalize("Nidoran♂"), "nidoran-m");
    }

    #[test]
    fn apostrophes_and_accents() {
        assert_eq!(normalize("Farfetch'd"), "farfetchd");
        assert_eq!(normalize("Flabébé"), "flabebe");
        // Uppercase accent is lowercased before the check.
        assert_eq!(normalize("FLABÉBÉ"), "flabebe");
    }

    #[test]
    fn unexpected_input_falls_through() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("Porygon  Z"), "porygon-z");
    }
}
