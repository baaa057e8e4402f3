//! Locale file input definitions

use std::collections::BTreeMap;
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use crate::types::KeyPath;

/// Nested mapping from translation keys to leaves or further mappings.
pub type LocaleTree = BTreeMap<String, LocaleNode>;

/// One entry of a [`LocaleTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleNode {
    /// A translated string. Numbers, booleans, null and sequences are kept
    /// in their textual form; only the shape matters for parity.
    Leaf(String),
    Subtree(LocaleTree),
}

impl LocaleNode {
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }
}

/// Errors raised while reading a locale file.
#[derive(Error, Debug)]
pub enum LocaleError {
    #[error("Failed to read locale file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported locale file format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Locale document must be a mapping at the top level")]
    NotAMapping,

    #[error("Duplicate locale key '{0}'")]
    DuplicateKey(KeyPath),
}

/// On-disk format of a locale file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleFormat {
    Yaml,
    Json,
}

impl LocaleFormat {
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parses YAML text into a tree.
///
/// # Errors
/// Returns error if the text is not valid YAML or its top level is not a mapping.
pub fn parse_yaml(text: &str) -> Result<LocaleTree, LocaleError> {
    let mut value: serde_yaml::Value = serde_yaml::from_str(text)?;
    // `<<: *defaults` merge keys are common in hand-written locale files
    value.apply_merge()?;

    match yaml_node(value, &KeyPath::root())? {
        LocaleNode::Subtree(tree) => Ok(tree),
        LocaleNode::Leaf(_) => Err(LocaleError::NotAMapping),
    }
}

fn yaml_node(value: serde_yaml::Value, path: &KeyPath) -> Result<LocaleNode, LocaleError> {
    use serde_yaml::Value;

    let node = match value {
        Value::Mapping(map) => {
            let mut tree = LocaleTree::new();
            for (key, value) in map {
                let key = yaml_key(key);
                let child = path.child(&key);
                let node = yaml_node(value, &child)?;
                // `1:` and `"1":` are distinct YAML keys but the same locale key
                if tree.insert(key, node).is_some() {
                    return Err(LocaleError::DuplicateKey(child));
                }
            }
            LocaleNode::Subtree(tree)
        }
        Value::Tagged(tagged) => yaml_node(tagged.value, path)?,
        Value::String(s) => LocaleNode::Leaf(s),
        Value::Null => LocaleNode::Leaf("null".to_string()),
        Value::Bool(b) => LocaleNode::Leaf(b.to_string()),
        Value::Number(n) => LocaleNode::Leaf(n.to_string()),
        sequence @ Value::Sequence(_) => LocaleNode::Leaf(
            serde_yaml::to_string(&sequence)
                .map_or_else(|_| String::new(), |s| s.trim_end().to_string()),
        ),
    };
    Ok(node)
}

fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value;

    match key {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        Value::Tagged(tagged) => yaml_key(tagged.value),
        other => serde_yaml::to_string(&other)
            .map_or_else(|_| String::new(), |s| s.trim_end().to_string()),
    }
}

/// Parses JSON text into a tree.
///
/// # Errors
/// Returns error if the text is not valid JSON or its top level is not an object.
pub fn parse_json(text: &str) -> Result<LocaleTree, LocaleError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    match json_node(value) {
        LocaleNode::Subtree(tree) => Ok(tree),
        LocaleNode::Leaf(_) => Err(LocaleError::NotAMapping),
    }
}

fn json_node(value: serde_json::Value) -> LocaleNode {
    use serde_json::Value;

    match value {
        Value::Object(map) => LocaleNode::Subtree(
            map.into_iter().map(|(key, value)| (key, json_node(value))).collect(),
        ),
        Value::String(s) => LocaleNode::Leaf(s),
        other => LocaleNode::Leaf(other.to_string()),
    }
}

/// Returns true if `key` looks like a language tag (`en`, `pt-BR`, `zh_Hant_TW`).
#[must_use]
pub fn is_language_tag(key: &str) -> bool {
    let mut subtags = key.split(['-', '_']);
    let Some(primary) = subtags.next() else {
        return false;
    };
    if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    subtags.all(|subtag| {
        (2..=8).contains(&subtag.len()) && subtag.chars().all(|c| c.is_ascii_alphanumeric())
    })
}

/// Lowercases and maps `-` to `_`, so `pt-BR` and `pt_br` compare equal.
fn normalize_language_code(code: &str) -> String {
    code.to_lowercase().replace('-', "_")
}

/// Returns true if the file name (`devise.es.yml`) or the parent directory
/// (`es/devise.yml`) names `language`.
fn path_names_language(path: &Path, language: &str) -> bool {
    let expected = normalize_language_code(language);

    let in_file_name = path.file_stem().is_some_and(|stem| {
        stem.to_string_lossy().split('.').any(|part| normalize_language_code(part) == expected)
    });
    let in_parent = path
        .parent()
        .and_then(Path::file_name)
        .is_some_and(|name| normalize_language_code(&name.to_string_lossy()) == expected);

    in_file_name || in_parent
}

/// A locale file loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFile {
    pub path: PathBuf,
    pub tree: LocaleTree,
}

impl LocaleFile {
    /// The conventional language root key (`en:` / `es:`), if the file has one.
    ///
    /// The root must be the only top-level key, hold a mapping, and name the
    /// same language as the file path.
    #[must_use]
    pub fn language_root(&self) -> Option<&str> {
        let mut entries = self.tree.iter();
        let (key, node) = entries.next()?;
        if entries.next().is_some() || node.is_leaf() || !is_language_tag(key) {
            return None;
        }
        path_names_language(&self.path, key).then_some(key.as_str())
    }
}

fn strip_language_root(tree: LocaleTree) -> LocaleTree {
    let mut entries = tree.into_iter();
    match (entries.next(), entries.next()) {
        (Some((_, LocaleNode::Subtree(inner))), None) => inner,
        (first, second) => first.into_iter().chain(second).chain(entries).collect(),
    }
}

/// Turns a baseline/target pair into the trees that get compared.
///
/// With `unwrap_root` the language roots are stripped, but only when both
/// files have one; otherwise both trees are compared as written.
#[must_use]
pub fn comparable_trees(
    baseline: LocaleFile,
    target: LocaleFile,
    unwrap_root: bool,
) -> (LocaleTree, LocaleTree) {
    let unwrap = unwrap_root
        && baseline.language_root().is_some()
        && target.language_root().is_some();

    tracing::debug!(
        baseline = %baseline.path.display(),
        target = %target.path.display(),
        unwrap,
        "Prepared locale pair"
    );

    if unwrap {
        (strip_language_root(baseline.tree), strip_language_root(target.tree))
    } else {
        (baseline.tree, target.tree)
    }
}

/// Load a locale file from disk.
///
/// # Errors
/// Returns error if the file cannot be read, its extension is unknown,
/// or its contents fail to parse.
pub fn load_locale_file(path: &Path) -> Result<LocaleFile, LocaleError> {
    let format = LocaleFormat::from_path(path)
        .ok_or_else(|| LocaleError::UnsupportedFormat { path: path.to_path_buf() })?;

    tracing::debug!(path = %path.display(), ?format, "Loading locale file");

    let content = std::fs::read_to_string(path)
        .map_err(|source| LocaleError::Io { path: path.to_path_buf(), source })?;

    let tree = match format {
        LocaleFormat::Yaml => parse_yaml(&content)?,
        LocaleFormat::Json => parse_json(&content)?,
    };

    Ok(LocaleFile { path: path.to_path_buf(), tree })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    fn leaf(value: &str) -> LocaleNode {
        LocaleNode::Leaf(value.to_string())
    }

    fn node_at<'t>(tree: &'t LocaleTree, path: &[&str]) -> Option<&'t LocaleNode> {
        let (first, rest) = path.split_first()?;
        let mut node = tree.get(*first)?;
        for segment in rest {
            match node {
                LocaleNode::Subtree(subtree) => node = subtree.get(*segment)?,
                LocaleNode::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    fn locale_file(path: &str, yaml: &str) -> LocaleFile {
        LocaleFile { path: PathBuf::from(path), tree: parse_yaml(yaml).unwrap() }
    }

    #[googletest::test]
    fn test_parse_yaml_nested() {
        let tree = parse_yaml(
            "devise:\n  sign_in:\n    title: Sign in\n  sign_out: Sign out\nhello: Hello\n",
        )
        .unwrap();

        expect_that!(node_at(&tree, &["hello"]), some(eq(&leaf("Hello"))));
        expect_that!(
            node_at(&tree, &["devise", "sign_in", "title"]),
            some(eq(&leaf("Sign in")))
        );
        expect_that!(
            node_at(&tree, &["devise", "sign_in"]).map(LocaleNode::is_leaf),
            eq(Some(false))
        );
    }

    #[googletest::test]
    fn test_parse_yaml_scalars_and_sequences_are_leaves() {
        let tree = parse_yaml(
            "count: 3\nenabled: true\nempty:\nday_names:\n  - Sunday\n  - Monday\n",
        )
        .unwrap();

        expect_that!(tree.get("count"), some(eq(&leaf("3"))));
        expect_that!(tree.get("enabled"), some(eq(&leaf("true"))));
        expect_that!(tree.get("empty"), some(eq(&leaf("null"))));
        expect_that!(tree.get("day_names").map(LocaleNode::is_leaf), eq(Some(true)));
    }

    #[googletest::test]
    fn test_parse_yaml_non_string_keys() {
        let tree = parse_yaml("true: Yes\n1: One\n").unwrap();

        expect_that!(tree.get("true"), some(eq(&leaf("Yes"))));
        expect_that!(tree.get("1"), some(eq(&leaf("One"))));
    }

    #[googletest::test]
    fn test_parse_yaml_merge_keys() {
        let tree = parse_yaml(
            "defaults: &defaults\n  title: Title\nform:\n  <<: *defaults\n  submit: Submit\n",
        )
        .unwrap();

        expect_that!(
            node_at(&tree, &["form", "title"]),
            some(eq(&leaf("Title")))
        );
        expect_that!(
            node_at(&tree, &["form", "submit"]),
            some(eq(&leaf("Submit")))
        );
    }

    #[rstest]
    #[case::scalar("just a string")]
    #[case::sequence("- a\n- b\n")]
    fn test_parse_yaml_rejects_non_mapping(#[case] text: &str) {
        assert!(matches!(parse_yaml(text), Err(LocaleError::NotAMapping)));
    }

    #[rstest]
    fn test_parse_yaml_invalid() {
        assert!(matches!(parse_yaml("a: [unclosed"), Err(LocaleError::Yaml(_))));
    }

    #[googletest::test]
    fn test_parse_json_nested() {
        let tree = parse_json(r#"{"common": {"hello": "Hello"}, "count": 42}"#).unwrap();

        expect_that!(
            node_at(&tree, &["common", "hello"]),
            some(eq(&leaf("Hello")))
        );
        expect_that!(tree.get("count"), some(eq(&leaf("42"))));
    }

    #[rstest]
    fn test_parse_json_invalid() {
        assert!(matches!(parse_json("{invalid"), Err(LocaleError::Json(_))));
        assert!(matches!(parse_json("[1, 2]"), Err(LocaleError::NotAMapping)));
    }

    #[rstest]
    #[case("en", true)]
    #[case("pt-BR", true)]
    #[case("zh_Hant_TW", true)]
    #[case("kok", true)]
    #[case("devise", false)]
    #[case("e", false)]
    #[case("en-", false)]
    #[case("12", false)]
    fn test_is_language_tag(#[case] key: &str, #[case] expected: bool) {
        assert_eq!(is_language_tag(key), expected);
    }

    #[rstest]
    #[case("locales/en.yml", Some(LocaleFormat::Yaml))]
    #[case("locales/devise.en.YAML", Some(LocaleFormat::Yaml))]
    #[case("locales/en.json", Some(LocaleFormat::Json))]
    #[case("locales/en.toml", None)]
    #[case("locales/README", None)]
    fn test_format_from_path(#[case] path: &str, #[case] expected: Option<LocaleFormat>) {
        assert_eq!(LocaleFormat::from_path(Path::new(path)), expected);
    }

    #[rstest]
    fn test_parse_yaml_rejects_colliding_keys() {
        let result = parse_yaml("counts:\n  1: One\n  \"1\": Uno\n");

        assert!(matches!(
            result,
            Err(LocaleError::DuplicateKey(path)) if path == KeyPath::from(["counts", "1"])
        ));
    }

    #[rstest]
    #[case::file_name("locales/es.yml", "es:\n  hello: Hola\n", Some("es"))]
    #[case::namespaced_file("locales/devise.pt-BR.yml", "pt-BR:\n  hello: Ola\n", Some("pt-BR"))]
    #[case::normalized_code("locales/pt_br.yml", "pt-BR:\n  hello: Ola\n", Some("pt-BR"))]
    #[case::directory("locales/es/devise.yml", "es:\n  hello: Hola\n", Some("es"))]
    #[case::short_key_not_in_path("locales/es.yml", "ui:\n  save: Guardar\n", None)]
    #[case::other_language("locales/es.yml", "en:\n  hello: Hello\n", None)]
    #[case::several_keys("locales/es.yml", "es:\n  hello: Hola\nui:\n  save: Guardar\n", None)]
    #[case::leaf_root("locales/es.yml", "es: Hola\n", None)]
    fn test_language_root(#[case] path: &str, #[case] yaml: &str, #[case] expected: Option<&str>) {
        assert_eq!(locale_file(path, yaml).language_root(), expected);
    }

    #[googletest::test]
    fn test_comparable_trees_strips_both_roots() {
        let baseline = locale_file("locales/en.yml", "en:\n  hello: Hello\n");
        let target = locale_file("locales/es.yml", "es:\n  hello: Hola\n");

        let (baseline, target) = comparable_trees(baseline, target, true);

        expect_that!(baseline.get("hello"), some(eq(&leaf("Hello"))));
        expect_that!(target.get("hello"), some(eq(&leaf("Hola"))));
    }

    #[googletest::test]
    fn test_comparable_trees_keeps_roots_unless_both_have_one() {
        let baseline = locale_file("locales/en.yml", "en:\n  hello: Hello\n");
        let target = locale_file("locales/es.yml", "hello: Hola\n");

        let (baseline, target) = comparable_trees(baseline, target, true);

        expect_that!(node_at(&baseline, &["en", "hello"]), some(eq(&leaf("Hello"))));
        expect_that!(target.get("hello"), some(eq(&leaf("Hola"))));
    }

    #[googletest::test]
    fn test_comparable_trees_disabled() {
        let baseline = locale_file("locales/en.yml", "en:\n  hello: Hello\n");
        let target = locale_file("locales/es.yml", "es:\n  hello: Hola\n");

        let (baseline, target) = comparable_trees(baseline, target, false);

        expect_that!(baseline.contains_key("en"), eq(true));
        expect_that!(target.contains_key("es"), eq(true));
    }

    #[googletest::test]
    fn test_load_locale_file_keeps_tree_as_written() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("es.yml");
        fs::write(&path, "es:\n  hello: Hola\n").unwrap();

        let file = load_locale_file(&path).unwrap();

        expect_that!(file.language_root(), some(eq("es")));
        expect_that!(node_at(&file.tree, &["es", "hello"]), some(eq(&leaf("Hola"))));
    }

    #[rstest]
    fn test_load_locale_file_missing() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_locale_file(&temp_dir.path().join("en.yml"));

        assert!(matches!(result, Err(LocaleError::Io { .. })));
    }

    #[rstest]
    fn test_load_locale_file_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("en.txt");
        fs::write(&path, "hello").unwrap();

        let result = load_locale_file(&path);

        assert!(matches!(result, Err(LocaleError::UnsupportedFormat { .. })));
    }
}
