#![no_main]

use footprint::{evaluate, ResourceLimits, RuleRegistry, Situation};
use libfuzzer_sys::fuzz_target;

const MODEL: &str = r#"{
    "total": { "formule": { "somme": ["a", "b"] } },
    "a": { "applicable si": "c", "par défaut": 2 },
    "b": { "formule": { "variations": [{ "si": "a > 1", "alors": "3" }, { "sinon": 4 }] } }
}"#;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let limits = ResourceLimits::default();
        let Ok(situation) = Situation::from_json_str(s, "fuzz_situation", &limits) else {
            return;
        };
        let Ok(rules) = RuleRegistry::from_json_str(MODEL, "model.json", &limits) else {
            return;
        };

        let _ = evaluate("total", &situation, &rules);
    }
});
