//! 同梱のロケールファイルに対するパリティチェックのテスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(missing_docs)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{
    Path,
    PathBuf,
};

use locale_parity::config::ConfigManager;
use locale_parity::registry::RegistryError;
use locale_parity::{
    CheckOptions,
    KeyPath,
    LocaleRegistry,
    check_project,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_registry(root: &Path) -> LocaleRegistry {
    let mut manager = ConfigManager::new(root.to_path_buf());
    manager.load_settings().unwrap();
    LocaleRegistry::from_settings(manager.project_root(), manager.get_settings()).unwrap()
}

/// Copies the fixture project into a scratch directory so tests can edit it.
fn scratch_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let source = fixtures_root();
    fs::copy(source.join(".locale-parity.json"), temp_dir.path().join(".locale-parity.json"))
        .unwrap();

    let locales = temp_dir.path().join("locales");
    fs::create_dir_all(&locales).unwrap();
    for entry in fs::read_dir(source.join("locales")).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), locales.join(entry.file_name())).unwrap();
    }
    temp_dir
}

#[rstest]
#[case::application("english", "spanish")]
#[case::application_pt("english", "portuguese")]
#[case::devise("devise_english", "devise_spanish")]
#[case::devise_pt("devise_english", "devise_portuguese")]
#[case::devise_invitable("devise_invitable_english", "devise_invitable_spanish")]
#[case::devise_invitable_pt("devise_invitable_english", "devise_invitable_portuguese")]
#[case::kaminari("kaminari_english", "kaminari_spanish")]
#[case::kaminari_pt("kaminari_english", "kaminari_portuguese")]
fn translations_include_all_baseline_keys(#[case] baseline: &str, #[case] target: &str) {
    let registry = load_registry(&fixtures_root());

    let missing = registry.compare(baseline, target).unwrap();

    assert_eq!(missing, BTreeSet::new());
}

#[test]
fn every_locale_file_on_disk_is_registered() {
    let registry = load_registry(&fixtures_root());

    let on_disk = registry.files_on_disk().unwrap();
    let registered: BTreeSet<PathBuf> = registry.files().values().cloned().collect();

    assert_eq!(on_disk, registered);
    assert!(registry.audit().unwrap().is_consistent());
}

#[test]
fn fixture_project_is_clean() {
    let report = check_project(&fixtures_root(), CheckOptions { report_extra: true }).unwrap();

    assert_eq!(report.comparisons.len(), 8);
    assert!(report.is_clean(), "unexpected report:\n{report}");
}

#[test]
fn removed_key_is_reported_exactly() {
    let project = scratch_project();
    let spanish = project.path().join("locales/devise.es.yml");
    let content = fs::read_to_string(&spanish).unwrap();
    let edited: String = content
        .lines()
        .filter(|line| !line.contains("signed_out"))
        .map(|line| format!("{line}\n"))
        .collect();
    fs::write(&spanish, edited).unwrap();

    let registry = load_registry(project.path());
    let missing = registry.compare("devise_english", "devise_spanish").unwrap();

    assert_eq!(missing, BTreeSet::from([KeyPath::from(["devise", "sessions", "signed_out"])]));
}

#[test]
fn leaf_replaced_by_subtree_is_reported() {
    let project = scratch_project();
    let portuguese = project.path().join("locales/pt.yml");
    let content = fs::read_to_string(&portuguese).unwrap().replace(
        "    title: Lembretes\n",
        "    title:\n      one: Lembrete\n      other: Lembretes\n",
    );
    fs::write(&portuguese, content).unwrap();

    let registry = load_registry(project.path());
    let missing = registry.compare("english", "portuguese").unwrap();

    assert_eq!(missing, BTreeSet::from([KeyPath::from(["reminders", "title"])]));
}

#[test]
fn subtree_replaced_by_value_reports_each_leaf() {
    let project = scratch_project();
    let spanish = project.path().join("locales/kaminari.es.yml");
    let content = fs::read_to_string(&spanish).unwrap();
    let start = content.find("  views:\n").unwrap();
    let end = content.find("  helpers:\n").unwrap();
    fs::write(&spanish, format!("{}  views: Vistas\n{}", &content[..start], &content[end..]))
        .unwrap();

    let registry = load_registry(project.path());
    let missing = registry.compare("kaminari_english", "kaminari_spanish").unwrap();

    let pagination = |key: &str| KeyPath::from(["views", "pagination", key]);
    assert_eq!(
        missing,
        BTreeSet::from([
            pagination("first"),
            pagination("last"),
            pagination("next"),
            pagination("previous"),
            pagination("truncate"),
        ])
    );
}

#[test]
fn orphaned_locale_file_breaks_audit() {
    let project = scratch_project();
    fs::write(project.path().join("locales/fr.yml"), "fr:\n  hello: Bonjour\n").unwrap();

    let report = check_project(project.path(), CheckOptions::default()).unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.discrepancy_count(), 0);
    assert_eq!(report.audit.unregistered, BTreeSet::from([PathBuf::from("fr.yml")]));
}

#[test]
fn deleted_registered_file_is_fatal() {
    let project = scratch_project();
    fs::remove_file(project.path().join("locales/kaminari.pt.yml")).unwrap();

    let registry = load_registry(project.path());
    let result = registry.compare("kaminari_english", "kaminari_portuguese");

    match result {
        Err(RegistryError::MissingFile { name, .. }) => assert_eq!(name, "kaminari_portuguese"),
        other => panic!("Expected MissingFile, got {other:?}"),
    }
}
