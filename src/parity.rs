//! 翻訳キーのパリティチェック
//!
//! ベースライン（通常は英語）のロケールツリーに存在する全てのキーが、
//! 対象ロケールに同じ構造で存在するかを検査します。

use std::collections::{
    BTreeMap,
    BTreeSet,
};

use serde::Serialize;

use crate::input::locale::{
    LocaleNode,
    LocaleTree,
};
use crate::types::KeyPath;

/// 不一致の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscrepancyKind {
    /// 対象ロケールにキーが存在しない
    Missing,
    /// ベースラインでは値だが、対象ではネストしたマッピング
    ExpectedLeaf,
    /// 祖先のキーが対象では値になっており、リーフに到達できない
    BlockedByLeaf,
}

impl DiscrepancyKind {
    /// レポート用の短い説明
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::ExpectedLeaf => "expected a value, found a nested mapping",
            Self::BlockedByLeaf => "a parent key is a value in the target",
        }
    }
}

/// ベースラインと対象を比較し、不一致のキーパスを種類付きで返す
///
/// ベースラインのツリーを再帰的に走査し、各リーフが対象でも
/// リーフとして解決できるかを確認します。報告されるのは常に
/// ベースラインのリーフのパスです。ただしベースラインの値が対象で
/// マッピングになっている場合は、そのパスを `ExpectedLeaf` として報告します。
///
/// 対象にのみ存在するキーは報告しません（一方向のチェック）。
#[must_use]
pub fn find_discrepancies(
    baseline: &LocaleTree,
    target: &LocaleTree,
) -> BTreeMap<KeyPath, DiscrepancyKind> {
    let mut result = BTreeMap::new();
    walk(baseline, target, &KeyPath::root(), &mut result);
    result
}

fn walk(
    baseline: &LocaleTree,
    target: &LocaleTree,
    prefix: &KeyPath,
    result: &mut BTreeMap<KeyPath, DiscrepancyKind>,
) {
    for (key, baseline_node) in baseline {
        let path = prefix.child(key);

        match (baseline_node, target.get(key)) {
            (LocaleNode::Leaf(_), Some(LocaleNode::Leaf(_))) => {}
            (LocaleNode::Subtree(subtree), Some(LocaleNode::Subtree(target_subtree))) => {
                walk(subtree, target_subtree, &path, result);
            }
            (LocaleNode::Leaf(_), Some(LocaleNode::Subtree(_))) => {
                result.insert(path, DiscrepancyKind::ExpectedLeaf);
            }
            (LocaleNode::Subtree(subtree), Some(LocaleNode::Leaf(_))) => {
                mark_leaves(subtree, &path, DiscrepancyKind::BlockedByLeaf, result);
            }
            (LocaleNode::Leaf(_), None) => {
                result.insert(path, DiscrepancyKind::Missing);
            }
            (LocaleNode::Subtree(subtree), None) => {
                mark_leaves(subtree, &path, DiscrepancyKind::Missing, result);
            }
        }
    }
}

/// `subtree` 以下の全リーフを `kind` として記録する（空のマッピングは何も記録しない）
fn mark_leaves(
    subtree: &LocaleTree,
    prefix: &KeyPath,
    kind: DiscrepancyKind,
    result: &mut BTreeMap<KeyPath, DiscrepancyKind>,
) {
    for (key, node) in subtree {
        let path = prefix.child(key);
        match node {
            LocaleNode::Leaf(_) => {
                result.insert(path, kind);
            }
            LocaleNode::Subtree(nested) => mark_leaves(nested, &path, kind, result),
        }
    }
}

/// ベースラインに存在するが対象に欠けている、または構造が異なるキーパスの集合
///
/// 空集合なら完全なパリティを意味します。
///
/// # Examples
/// ```
/// use locale_parity::input::locale::parse_yaml;
/// use locale_parity::parity::compare_trees;
/// use locale_parity::types::KeyPath;
///
/// let baseline = parse_yaml("a:\n  b: x\nc: y\n").unwrap();
/// let target = parse_yaml("a:\n  b: x\n").unwrap();
///
/// let missing = compare_trees(&baseline, &target);
/// assert_eq!(missing.into_iter().collect::<Vec<_>>(), vec![KeyPath::from(["c"])]);
/// ```
#[must_use]
pub fn compare_trees(baseline: &LocaleTree, target: &LocaleTree) -> BTreeSet<KeyPath> {
    find_discrepancies(baseline, target).into_keys().collect()
}

/// 対象にのみ存在するリーフのキーパス
///
/// `compare_trees` には含まれない逆方向の差分です。構造の食い違いは
/// `compare_trees` 側で報告されるため、ここでは欠落のみを返します。
#[must_use]
pub fn extra_keys(baseline: &LocaleTree, target: &LocaleTree) -> BTreeSet<KeyPath> {
    find_discrepancies(target, baseline)
        .into_iter()
        .filter(|(_, kind)| *kind == DiscrepancyKind::Missing)
        .map(|(path, _)| path)
        .collect()
}
