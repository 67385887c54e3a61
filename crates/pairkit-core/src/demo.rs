use pairkit_ir::types::{Domains, Pattern, Spec};

/// Browser × OS × Auth with two forbids; used by `pairkit demo`.
pub fn demo_spec() -> Spec {
    Spec {
        parameters: Domains::new()
            .with("Browser", ["Chrome", "Firefox", "Safari"])
            .with("OS", ["Windows", "macOS", "Linux"])
            .with("Auth", ["SAML", "Basic", "OAuth"]),
        forbid: vec![
            Pattern::new([("Browser", "Safari"), ("OS", "Windows")]),
            Pattern::new([("Auth", "SAML"), ("OS", "Linux")]),
        ],
        require: Vec::new(),
        generation: Default::default(),
    }
}
