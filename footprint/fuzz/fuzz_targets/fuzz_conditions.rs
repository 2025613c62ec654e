#![no_main]

use footprint::{evaluate_condition, RuleRegistry, Situation};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let rules = RuleRegistry::new();
        let situation = Situation::new()
            .with("a . b", 12)
            .with("a . c", "oui")
            .with("a . d", "'texte'");

        let _ = evaluate_condition(s, &situation, &rules);
    }
});
