use crate::models::{Difficulty, IngredientLine, Recipe};

fn line(name: &str, quantity: &str, price: f64) -> IngredientLine {
    IngredientLine::new(name, quantity, price)
}

fn steps(steps: &[&str]) -> Vec<String> {
    steps.iter().map(|s| s.to_string()).collect()
}

/// Built-in recipes a fresh catalog starts with.
pub fn default_recipes() -> Vec<Recipe> {
    vec![
        Recipe {
            id: 1,
            name: "Kjøttdeiggryte med ris".to_string(),
            prep_time: "20-30 minutter".to_string(),
            difficulty: Difficulty::Easy,
            ingredients: vec![
                line("Kjøttdeig", "400g", 65.0),
                line("Løk", "1 stk", 5.0),
                line("Paprika", "1 stk", 15.0),
                line("Hermetiske tomater", "1 boks", 15.0),
                line("Glutenfri buljongterning", "1 stk", 3.0),
                line("Ris", "2 dl", 10.0),
            ],
            steps: steps(&[
                "Finhakk løk og paprika.",
                "Brun kjøttdeigen i en gryte.",
                "Tilsett løk og paprika, stek i 2-3 minutter.",
                "Ha i hermetiske tomater og buljongterning.",
                "La småkoke i 15 minutter.",
                "Kok ris etter anvisning på pakken.",
                "Server kjøttdeiggryta over risen.",
            ]),
            image: None,
            allergens: Vec::new(),
        },
        Recipe {
            id: 2,
            name: "Bakt søtpotet med kikerter".to_string(),
            prep_time: "45 minutter".to_string(),
            difficulty: Difficulty::Medium,
            ingredients: vec![
                line("Søtpotet", "2 stk", 25.0),
                line("Kikerter", "1 boks", 15.0),
                line("Tahini", "2 ss", 10.0),
            ],
            steps: steps(&[
                "Forvarm ovnen til 200°C.",
                "Prikk hull i søtpotetene med en gaffel.",
                "Bak søtpotetene i ca. 40 minutter til de er møre.",
                "Bland kikerter med krydder og varm opp.",
                "Server kikertene over de bakte søtpotetene med tahini på topp.",
            ]),
            image: None,
            allergens: Vec::new(),
        },
        Recipe {
            id: 3,
            name: "Quinoasalat med avokado".to_string(),
            prep_time: "15 minutter".to_string(),
            difficulty: Difficulty::Easy,
            ingredients: vec![
                line("Quinoa", "1 dl", 18.0),
                line("Avokado", "1 stk", 20.0),
                line("Sitron", "1/2 stk", 5.0),
            ],
            steps: steps(&[
                "Kok quinoa etter anvisning på pakken.",
                "Avkjøl quinoaen.",
                "Skjær avokado i terninger.",
                "Bland avokado med quinoa.",
                "Press over sitronsaft og server.",
            ]),
            image: None,
            allergens: Vec::new(),
        },
    ]
}
