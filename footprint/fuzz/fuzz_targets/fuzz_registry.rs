#![no_main]

use footprint::{evaluate, ResourceLimits, RuleRegistry, Situation};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let Ok(rules) = RuleRegistry::from_json_str(s, "fuzz_registry", &ResourceLimits::default())
        else {
            return;
        };

        // Every rule must evaluate without panicking or looping
        let situation = Situation::new();
        for name in rules.names() {
            let _ = evaluate(name, &situation, &rules);
        }
    }
});
