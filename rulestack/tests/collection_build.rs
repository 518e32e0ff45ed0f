//! End-to-end builds from YAML files on disk.

use anyhow::{Context, Result, anyhow, ensure};
use camino::Utf8PathBuf;
use rulestack::{Rule, RuleCollection};
use tempfile::TempDir;

fn utf8_root(dir: &TempDir) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .map_err(|path| anyhow!("temporary directory is not UTF-8: {}", path.display()))
}

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> Result<()> {
    std::fs::write(dir.path().join(name), contents)
        .with_context(|| format!("write fixture {name}"))
}

fn titles(collection: &RuleCollection<Rule>) -> Vec<Option<&str>> {
    collection.iter().map(|rule| rule.title.as_deref()).collect()
}

#[test]
fn include_expands_in_source_order() -> Result<()> {
    let dir = TempDir::new().context("create fixture directory")?;
    write_fixture(&dir, "rule1.yml", "title: Test 1\n")?;
    write_fixture(&dir, "rule2.yml", "title: Test 2\n")?;
    write_fixture(
        &dir,
        "include.yml",
        concat!(
            "action: include\n",
            "filename: rule1.yml\n",
            "---\n",
            "action: include\n",
            "filename: rule2.yml\n",
        ),
    )?;
    let base = utf8_root(&dir)?;
    let collection = RuleCollection::<Rule>::from_yaml_path(base.join("include.yml"))
        .map_err(|err| anyhow!("unexpected build failure: {err}"))?;
    ensure!(collection.len() == 2, "expected two included rules");
    ensure!(
        titles(&collection) == vec![Some("Test 1"), Some("Test 2")],
        "unexpected titles {:?}",
        titles(&collection)
    );
    Ok(())
}

#[test]
fn nested_includes_resolve_against_the_original_base() -> Result<()> {
    let dir = TempDir::new().context("create fixture directory")?;
    write_fixture(&dir, "rule1.yml", "title: Test 1\n")?;
    write_fixture(&dir, "rule2.yml", "title: Test 2\n")?;
    // The nested include names its target relative to the top-level base
    // path, not relative to inner.yml's own location.
    std::fs::create_dir(dir.path().join("sub")).context("create sub directory")?;
    write_fixture(
        &dir,
        "sub/inner.yml",
        concat!(
            "action: include\n",
            "filename: rule1.yml\n",
            "---\n",
            "action: include\n",
            "filename: rule2.yml\n",
        ),
    )?;
    write_fixture(
        &dir,
        "recursive.yml",
        "action: include\nfilename: sub/inner.yml\n",
    )?;
    let base = utf8_root(&dir)?;
    let collection = RuleCollection::<Rule>::from_yaml_path(base.join("recursive.yml"))
        .map_err(|err| anyhow!("unexpected build failure: {err}"))?;
    ensure!(collection.len() == 2, "expected two transitively included rules");
    ensure!(
        titles(&collection) == vec![Some("Test 1"), Some("Test 2")],
        "unexpected titles {:?}",
        titles(&collection)
    );
    Ok(())
}

#[test]
fn cyclic_includes_fail_with_a_recursion_error() -> Result<()> {
    let dir = TempDir::new().context("create fixture directory")?;
    write_fixture(&dir, "a.yml", "action: include\nfilename: b.yml\n")?;
    write_fixture(&dir, "b.yml", "action: include\nfilename: a.yml\n")?;
    let base = utf8_root(&dir)?;
    match RuleCollection::<Rule>::from_yaml_path(base.join("a.yml")) {
        Ok(collection) => Err(anyhow!(
            "expected a recursion failure, got {} rules",
            collection.len()
        )),
        Err(err) => {
            let message = err.to_string();
            ensure!(
                message.contains("recursion"),
                "unexpected error {message:?}; expected a recursion message"
            );
            Ok(())
        }
    }
}

#[test]
fn from_yaml_builds_multi_document_streams() -> Result<()> {
    let collection = RuleCollection::<Rule>::from_yaml(concat!(
        "action: global\n",
        "title: Shared\n",
        "detection:\n",
        "  condition: sel\n",
        "---\n",
        "logsource:\n",
        "  category: one\n",
        "---\n",
        "logsource:\n",
        "  category: two\n",
    ))
    .map_err(|err| anyhow!("unexpected build failure: {err}"))?;
    ensure!(collection.len() == 2, "the global document emits nothing");
    ensure!(
        titles(&collection) == vec![Some("Shared"), Some("Shared")],
        "unexpected titles {:?}",
        titles(&collection)
    );
    Ok(())
}

#[test]
fn from_yaml_without_a_base_path_rejects_includes() -> Result<()> {
    let result = RuleCollection::<Rule>::from_yaml("action: include\nfilename: x.yml\n");
    match result {
        Ok(collection) => Err(anyhow!(
            "expected a base path failure, got {} rules",
            collection.len()
        )),
        Err(err) => {
            ensure!(
                err.to_string().contains("base path"),
                "unexpected error {err}"
            );
            Ok(())
        }
    }
}
