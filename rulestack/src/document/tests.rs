//! Tests for document stream parsing.

use anyhow::{Result, ensure};
use rstest::rstest;
use serde_json::json;

use super::DocumentStream;
use crate::error::CollectionError;

#[test]
fn yaml_stream_preserves_document_order() -> Result<()> {
    let stream = DocumentStream::from_yaml(
        concat!(
            "title: First\n",
            "---\n",
            "title: Second\n",
            "---\n",
            "title: Third\n",
        ),
        "inline",
    )?;
    let titles: Vec<_> = stream
        .into_iter()
        .map(|doc| doc.get("title").cloned())
        .collect();
    ensure!(
        titles
            == vec![
                Some(json!("First")),
                Some(json!("Second")),
                Some(json!("Third"))
            ],
        "unexpected document order: {titles:?}"
    );
    Ok(())
}

#[test]
fn empty_yaml_documents_are_skipped() -> Result<()> {
    let stream = DocumentStream::from_yaml("---\n---\ntitle: Only\n", "inline")?;
    ensure!(
        stream.len() == 1,
        "expected the null documents to be dropped, got {} documents",
        stream.len()
    );
    Ok(())
}

#[rstest]
#[case::scalar_document("just a string\n")]
#[case::sequence_document("- item\n- item\n")]
fn non_mapping_documents_are_rejected(#[case] data: &str) -> Result<()> {
    match DocumentStream::from_yaml(data, "inline") {
        Ok(stream) => anyhow::bail!("expected a document error, got {} documents", stream.len()),
        Err(CollectionError::Document { source_name, index }) => {
            ensure!(source_name == "inline", "unexpected source {source_name:?}");
            ensure!(index == 0, "unexpected document index {index}");
            Ok(())
        }
        Err(other) => anyhow::bail!("unexpected error variant: {other}"),
    }
}

#[test]
fn malformed_yaml_is_a_parse_error() -> Result<()> {
    let result = DocumentStream::from_yaml("title: [unclosed\n", "broken.yml");
    match result {
        Err(CollectionError::Parse { source_name, .. }) => {
            ensure!(
                source_name == "broken.yml",
                "parse errors should carry the source name"
            );
            Ok(())
        }
        Err(other) => anyhow::bail!("unexpected error variant: {other}"),
        Ok(stream) => anyhow::bail!("expected a parse error, got {} documents", stream.len()),
    }
}

#[test]
fn values_must_be_mappings() -> Result<()> {
    let result = DocumentStream::from_values([json!({"ok": true}), json!(42)]);
    ensure!(
        matches!(result, Err(CollectionError::Document { index: 1, .. })),
        "the scalar value at index 1 should be rejected"
    );
    Ok(())
}
