//! Typed view of the token-metadata response.
//!
//! Only the off-chain fields the pipeline reads or rewrites are typed. Everything else is
//! kept as raw JSON so a persisted document matches what the service returned.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the token-metadata response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub account: String,
    #[serde(default, alias = "onChainInfo")]
    pub on_chain_account_info: Value,
    #[serde(default)]
    pub on_chain_metadata: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub off_chain_metadata: OffChainMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OffChainMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: OffChainDocument,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uri: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: String,
}

impl OffChainMetadata {
    /// The upstream error reported for this record, if any.
    pub fn upstream_error(&self) -> Option<&str> {
        (!self.error.is_empty()).then_some(self.error.as_str())
    }
}

/// The off-chain JSON document persisted as `metadata/<mint>.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffChainDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OffChainDocument {
    /// Royalty as a fraction of the sale price, from `seller_fee_basis_points`.
    pub fn royalty(&self) -> Option<f64> {
        ["seller_fee_basis_points", "sellerFeeBasisPoints"]
            .iter()
            .find_map(|key| self.extra.get(*key).and_then(Value::as_f64))
            .map(|points| points / 10_000.0)
    }

    /// Points `image` and the first `properties.files` entry at `uri`.
    pub fn rewrite_image_uri(&mut self, uri: &str) {
        self.image = Some(uri.to_string());
        if let Some(file) = self
            .properties
            .as_mut()
            .and_then(|properties| properties.files.as_mut())
            .and_then(|files| files.first_mut())
        {
            file.uri = Some(uri.to_string());
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creators: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A rewritten asset location recorded in `changeList.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub mint_account: String,
    pub new_uri: String,
}

pub type ChangeList = Vec<ChangeEntry>;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> Value {
        json!({
            "account": "m1",
            "onChainAccountInfo": { "accountInfo": { "key": "m1" }, "error": "" },
            "onChainMetadata": { "metadata": { "mint": "m1" } },
            "offChainMetadata": {
                "metadata": {
                    "name": "Token #1",
                    "symbol": "TKN",
                    "description": "first",
                    "image": "https://arweave.net/abc",
                    "seller_fee_basis_points": 500,
                    "external_url": "https://example.com",
                    "attributes": [
                        { "trait_type": "Background", "value": "Blue" },
                        { "trait_type": "Level", "value": 3 }
                    ],
                    "properties": {
                        "category": "image",
                        "files": [
                            { "type": "image/png", "uri": "https://arweave.net/abc" },
                            { "type": "video/mp4", "uri": "https://arweave.net/def" }
                        ],
                        "creators": [ { "address": "creator", "share": 100 } ]
                    }
                },
                "uri": "https://arweave.net/json",
                "error": ""
            }
        })
    }

    #[test]
    fn decodes_record_and_keeps_unknown_fields() {
        let record: TokenMetadata = serde_json::from_value(sample_record()).expect("decode");
        assert_eq!(record.account, "m1");
        assert_eq!(record.off_chain_metadata.upstream_error(), None);

        let doc = &record.off_chain_metadata.metadata;
        assert_eq!(doc.name.as_deref(), Some("Token #1"));
        assert_eq!(doc.royalty(), Some(0.05));
        assert_eq!(
            doc.extra.get("external_url"),
            Some(&json!("https://example.com"))
        );
        assert_eq!(doc.attributes.as_ref().map(Vec::len), Some(2));
        assert_eq!(record.on_chain_metadata["metadata"]["mint"], json!("m1"));
    }

    #[test]
    fn document_serializes_back_to_source_json() {
        let source = sample_record()["offChainMetadata"]["metadata"].clone();
        let doc: OffChainDocument = serde_json::from_value(source.clone()).expect("decode");
        assert_eq!(serde_json::to_value(&doc).expect("encode"), source);
    }

    #[test]
    fn accepts_on_chain_info_alias_and_null_off_chain_fields() {
        let record: TokenMetadata = serde_json::from_value(json!({
            "account": "m2",
            "onChainInfo": { "accountInfo": null },
            "offChainMetadata": { "metadata": null, "uri": null, "error": "404 Not Found" }
        }))
        .expect("decode");

        assert!(record.on_chain_account_info.is_object());
        assert_eq!(record.off_chain_metadata.metadata, OffChainDocument::default());
        assert_eq!(
            record.off_chain_metadata.upstream_error(),
            Some("404 Not Found")
        );
    }

    #[test]
    fn whitespace_error_still_counts_and_is_kept_verbatim() {
        let record: TokenMetadata = serde_json::from_value(json!({
            "account": "c",
            "offChainMetadata": { "metadata": { "name": "x" }, "uri": "", "error": "   " }
        }))
        .expect("decode");

        assert_eq!(record.off_chain_metadata.upstream_error(), Some("   "));
    }

    #[test]
    fn rewrite_touches_image_and_first_file_only() {
        let source = sample_record()["offChainMetadata"]["metadata"].clone();
        let mut doc: OffChainDocument = serde_json::from_value(source).expect("decode");

        doc.rewrite_image_uri("http://cdn/m1.png");

        assert_eq!(doc.image.as_deref(), Some("http://cdn/m1.png"));
        let files = doc
            .properties
            .as_ref()
            .and_then(|properties| properties.files.as_ref())
            .expect("files");
        assert_eq!(files[0].uri.as_deref(), Some("http://cdn/m1.png"));
        assert_eq!(files[0].kind.as_deref(), Some("image/png"));
        assert_eq!(files[1].uri.as_deref(), Some("https://arweave.net/def"));
    }

    #[test]
    fn rewrite_without_files_sets_image() {
        let mut doc = OffChainDocument::default();
        doc.rewrite_image_uri("http://cdn/m3.gif");
        assert_eq!(doc.image.as_deref(), Some("http://cdn/m3.gif"));
        assert!(doc.properties.is_none());
    }

    #[test]
    fn change_entry_uses_snake_case_keys() {
        let entry = ChangeEntry {
            mint_account: "m1".to_string(),
            new_uri: "http://cdn/m1.png".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&entry).expect("encode"),
            json!({ "mint_account": "m1", "new_uri": "http://cdn/m1.png" })
        );
    }
}
