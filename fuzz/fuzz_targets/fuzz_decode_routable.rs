#![no_main]

use std::sync::{Arc, OnceLock};

use document_protocol::core::document::FieldKind;
use document_protocol::core::repo::{DocumentType, StaticDocumentTypeRepo};
use document_protocol::{Generation, RoutableRegistry};
use libfuzzer_sys::fuzz_target;

fn registry() -> Option<&'static RoutableRegistry> {
    static REGISTRY: OnceLock<Option<RoutableRegistry>> = OnceLock::new();
    REGISTRY
        .get_or_init(|| {
            let repo = StaticDocumentTypeRepo::new([DocumentType::new("music")
                .with_field("title", FieldKind::String)
                .with_field("year", FieldKind::Int)
                .with_field("flag", FieldKind::Bool)
                .with_field("blob", FieldKind::Raw)])
            .ok()?;
            RoutableRegistry::standard(Arc::new(repo)).ok()
        })
        .as_ref()
}

fuzz_target!(|data: &[u8]| {
    // Any input must decode or fail with an error, never panic
    let Some(registry) = registry() else { return };
    for generation in [Generation::V50, Generation::V51] {
        if let Ok(routable) = registry.decode_routable(data, generation) {
            // whatever decodes must encode again
            assert!(registry.encode_routable(&routable, generation).is_ok());
        }
    }
});
