//! Built-in sample payloads for smoke runs.
//!
//! Both payloads list implementors of `colstodian::traits::ColorEncoding`, one
//! per contributing library.

use crate::model::payload::Payload;
use crate::model::record::ImplementorRecord;

const TRAIT_LINK: &str =
    "<a class=\"trait\" href=\"colstodian/traits/trait.ColorEncoding.html\" title=\"trait colstodian::traits::ColorEncoding\">ColorEncoding</a>";

/// `module` is a `::`-separated path; hrefs use its `/`-separated form.
fn implementor(module: &str, name: &str) -> ImplementorRecord {
    let dir = module.replace("::", "/");
    ImplementorRecord::new(format!(
        "impl {TRAIT_LINK} for <a class=\"struct\" href=\"{dir}/struct.{name}.html\" \
         title=\"struct {module}::{name}\">{name}</a>"
    ))
}

/// Implementors defined by `colstodian` itself.
pub fn colstodian_payload() -> Payload {
    Payload::from_entries([(
        "colstodian",
        vec![
            implementor("colstodian::details::encodings", "LinearSrgb"),
            implementor("colstodian::details::encodings", "SrgbU8"),
            implementor("colstodian::details::encodings", "SrgbQuasiRadianceF16"),
        ],
    )])
    .with_source("colstodian/traits/trait.ColorEncoding.js")
}

/// Implementors contributed by a downstream library.
pub fn downstream_payload() -> Payload {
    Payload::from_entries([(
        "colstodian_wgpu",
        vec![
            implementor("colstodian_wgpu::encodings", "Rgba8UnormSrgb"),
            implementor("colstodian_wgpu::encodings", "Rgba16Float"),
        ],
    )])
    .with_source("colstodian_wgpu/traits/trait.ColorEncoding.js")
}

#[cfg(test)]
mod tests {
    use super::{colstodian_payload, downstream_payload};

    #[test]
    fn sample_payloads_use_disjoint_namespaces() {
        let colstodian = colstodian_payload();
        let downstream = downstream_payload();
        for namespace in colstodian.implementors.keys() {
            assert!(!downstream.implementors.contains_key(namespace));
        }
        assert_eq!(colstodian.record_count(), 3);
        assert_eq!(downstream.record_count(), 2);
    }

    #[test]
    fn sample_records_use_slash_separated_hrefs() {
        let payload = colstodian_payload();
        let first = payload
            .implementors
            .get("colstodian")
            .and_then(|records| records.first())
            .expect("sample has records");
        assert_eq!(first.plain_text(), "impl ColorEncoding for LinearSrgb");
        assert!(first
            .markup()
            .contains("href=\"colstodian/details/encodings/struct.LinearSrgb.html\""));
        assert!(first
            .markup()
            .contains("title=\"struct colstodian::details::encodings::LinearSrgb\""));
    }
}
