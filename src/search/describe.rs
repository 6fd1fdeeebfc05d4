//! Path labeling and natural-language description.
//!
//! A resolved path is a bare node sequence; the traversed relationship for
//! each hop is recovered by re-querying the neighbor resolver, then turned
//! into a gender-aware label read from the earlier person's perspective.

use crate::context::GraphContext;
use crate::model::{Gender, PersonId, RelationLabel, RelationshipFilter, RelationshipKind};
use crate::search::neighbors::neighbors;

/// Recover the relationship chain for `path` (one label per hop).
///
/// Each hop is looked up forward from `path[i]`; when the edge only exists
/// in the other direction (possible when the hop was taken by the backward
/// frontier) the reverse edge's kind is inverted: a parent edge seen from
/// the far side is a child edge from here, and vice versa. A hop that
/// resolves in neither direction is labeled `Unknown`.
pub fn relationship_chain(
    ctx: &GraphContext,
    path: &[PersonId],
    filter: &RelationshipFilter,
) -> Vec<RelationLabel> {
    if path.len() < 2 {
        return Vec::new();
    }

    let mut chain = Vec::with_capacity(path.len() - 1);
    for pair in path.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);

        let forward = neighbors(ctx, current, filter, false)
            .into_iter()
            .find(|e| &e.neighbor == next)
            .map(|e| e.kind);

        let kind = match forward {
            Some(kind) => Some(kind),
            None => neighbors(ctx, next, filter, false)
                .into_iter()
                .find(|e| &e.neighbor == current)
                .map(|e| invert_kind(e.kind)),
        };

        match kind {
            Some(kind) => chain.push(hop_label(ctx, kind, current)),
            None => {
                log::warn!(
                    "could not resolve relationship between {} and {} under {:?}",
                    current,
                    next,
                    filter.sorted_kinds()
                );
                chain.push(RelationLabel::Unknown);
            }
        }
    }
    chain
}

/// Invert an edge kind found from the far endpoint of a hop.
fn invert_kind(kind: RelationshipKind) -> RelationshipKind {
    match kind {
        // "next's parent is current" means next is current's child
        RelationshipKind::Parent | RelationshipKind::Mother | RelationshipKind::Father => {
            RelationshipKind::Child
        }
        RelationshipKind::Child => RelationshipKind::Parent,
        // spouse and sibling are symmetric
        RelationshipKind::Spouse => RelationshipKind::Spouse,
        RelationshipKind::Sibling => RelationshipKind::Sibling,
    }
}

/// Label one hop by the traversing person's recorded gender.
///
/// The label describes `from`: "`from` is the son of / father of / husband
/// of / brother of ...", falling back to the gender-neutral form when the
/// gender is unknown.
fn hop_label(ctx: &GraphContext, kind: RelationshipKind, from: &str) -> RelationLabel {
    let gender = ctx.relationships(from).and_then(|r| r.gender);
    match kind {
        RelationshipKind::Parent | RelationshipKind::Mother | RelationshipKind::Father => {
            match gender {
                Some(Gender::Male) => RelationLabel::SonOf,
                Some(Gender::Female) => RelationLabel::DaughterOf,
                None => RelationLabel::ChildOf,
            }
        }
        RelationshipKind::Child => match gender {
            Some(Gender::Male) => RelationLabel::FatherOf,
            Some(Gender::Female) => RelationLabel::MotherOf,
            None => RelationLabel::ParentOf,
        },
        RelationshipKind::Spouse => match gender {
            Some(Gender::Male) => RelationLabel::HusbandOf,
            Some(Gender::Female) => RelationLabel::WifeOf,
            None => RelationLabel::SpouseOf,
        },
        RelationshipKind::Sibling => match gender {
            Some(Gender::Male) => RelationLabel::BrotherOf,
            Some(Gender::Female) => RelationLabel::SisterOf,
            None => RelationLabel::SiblingOf,
        },
    }
}

fn name_of(ctx: &GraphContext, person: &str) -> String {
    ctx.display_name(person)
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Render a path and its chain as a single sentence.
///
/// One person is "Same person"; two people read "A is the father of B";
/// longer paths join the hops with ", who": "A is the father of B, who is
/// the husband of C".
pub fn describe_path(
    ctx: &GraphContext,
    path: &[PersonId],
    chain: &[RelationLabel],
) -> String {
    if path.len() <= 1 {
        return "Same person".to_string();
    }

    let names: Vec<String> = path.iter().map(|p| name_of(ctx, p)).collect();

    if path.len() == 2 {
        return format!("{} is the {} {}", names[0], chain[0].phrase(), names[1]);
    }

    let mut sentence = names[0].clone();
    for (i, label) in chain.iter().enumerate() {
        sentence.push_str(&format!(" is the {} {}", label.phrase(), names[i + 1]));
        if i < chain.len() - 1 {
            sentence.push_str(", who");
        }
    }
    sentence
}

/// Step-by-step rendering of a path, one string per hop:
/// `"Ann -> mother of -> Bob"`.
pub fn detailed_path(
    ctx: &GraphContext,
    path: &[PersonId],
    chain: &[RelationLabel],
) -> Vec<String> {
    path.windows(2)
        .zip(chain.iter())
        .map(|(pair, label)| {
            format!(
                "{} -> {} -> {}",
                name_of(ctx, &pair[0]),
                label.phrase(),
                name_of(ctx, &pair[1])
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MemoryProvider, PersonRecord};
    use std::sync::Arc;

    fn named(id: &str, name: &str, gender: Option<Gender>) -> PersonRecord {
        let mut record = PersonRecord::new(id);
        record.name = Some(name.to_string());
        record.gender = gender;
        record
    }

    /// John (M) married Mary (F); children Bob (M) and Sue (F).
    fn family_context() -> GraphContext {
        let mut provider = MemoryProvider::new();
        provider.insert(named("J", "John", Some(Gender::Male)));
        provider.insert(named("M", "Mary", Some(Gender::Female)));
        provider.insert(named("B", "Bob", Some(Gender::Male)));
        provider.insert(named("S", "Sue", Some(Gender::Female)));
        provider.link_spouses("J", "M");
        provider.link_parent_child("J", "B");
        provider.link_parent_child("M", "B");
        provider.link_parent_child("J", "S");
        provider.link_parent_child("M", "S");
        GraphContext::new(Arc::new(provider))
    }

    fn ids(ids: &[&str]) -> Vec<PersonId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parent_to_child_hop_labeled_by_parent_gender() {
        let ctx = family_context();
        let filter = RelationshipFilter::blood();
        let chain = relationship_chain(&ctx, &ids(&["J", "B"]), &filter);
        assert_eq!(chain, vec![RelationLabel::FatherOf]);
        let chain = relationship_chain(&ctx, &ids(&["M", "B"]), &filter);
        assert_eq!(chain, vec![RelationLabel::MotherOf]);
    }

    #[test]
    fn test_child_to_parent_hop_labeled_by_child_gender() {
        let ctx = family_context();
        let filter = RelationshipFilter::blood();
        let chain = relationship_chain(&ctx, &ids(&["B", "J"]), &filter);
        assert_eq!(chain, vec![RelationLabel::SonOf]);
        let chain = relationship_chain(&ctx, &ids(&["S", "M"]), &filter);
        assert_eq!(chain, vec![RelationLabel::DaughterOf]);
    }

    #[test]
    fn test_spouse_hop_labeled_by_subject_gender() {
        let ctx = family_context();
        let filter = RelationshipFilter::parse("spouse").unwrap();
        let chain = relationship_chain(&ctx, &ids(&["J", "M"]), &filter);
        assert_eq!(chain, vec![RelationLabel::HusbandOf]);
        let chain = relationship_chain(&ctx, &ids(&["M", "J"]), &filter);
        assert_eq!(chain, vec![RelationLabel::WifeOf]);
    }

    #[test]
    fn test_sibling_hop_labeled_by_subject_gender() {
        let ctx = family_context();
        let filter = RelationshipFilter::parse("sibling").unwrap();
        let chain = relationship_chain(&ctx, &ids(&["S", "B"]), &filter);
        assert_eq!(chain, vec![RelationLabel::SisterOf]);
    }

    #[test]
    fn test_reverse_lookup_inverts_parent_to_child() {
        let ctx = family_context();
        // Parent-only filter: J has no parents, so the J -> B hop resolves
        // only through B's reverse edge.
        let filter = RelationshipFilter::parse("parents").unwrap();
        let chain = relationship_chain(&ctx, &ids(&["J", "B"]), &filter);
        // B's parent edge to J, inverted, makes J the father.
        assert_eq!(chain, vec![RelationLabel::FatherOf]);
    }

    #[test]
    fn test_unresolvable_hop_is_unknown() {
        let ctx = family_context();
        let filter = RelationshipFilter::parse("spouse").unwrap();
        let chain = relationship_chain(&ctx, &ids(&["J", "B"]), &filter);
        assert_eq!(chain, vec![RelationLabel::Unknown]);
    }

    #[test]
    fn test_describe_identity() {
        let ctx = family_context();
        assert_eq!(describe_path(&ctx, &ids(&["J"]), &[]), "Same person");
    }

    #[test]
    fn test_describe_direct_relation() {
        let ctx = family_context();
        let path = ids(&["J", "B"]);
        let chain = relationship_chain(&ctx, &path, &RelationshipFilter::blood());
        assert_eq!(describe_path(&ctx, &path, &chain), "John is the father of Bob");
    }

    #[test]
    fn test_describe_longer_path_joins_with_who() {
        let ctx = family_context();
        let path = ids(&["B", "J", "M"]);
        let filter = RelationshipFilter::parse("default").unwrap();
        let chain = relationship_chain(&ctx, &path, &filter);
        assert_eq!(chain, vec![RelationLabel::SonOf, RelationLabel::HusbandOf]);
        assert_eq!(
            describe_path(&ctx, &path, &chain),
            "Bob is the son of John, who is the husband of Mary"
        );
    }

    #[test]
    fn test_describe_unnamed_people_fall_back_to_unknown() {
        let mut provider = MemoryProvider::new();
        provider.link_parent_child("P", "C");
        let ctx = GraphContext::new(Arc::new(provider));
        let path = ids(&["P", "C"]);
        let chain = relationship_chain(&ctx, &path, &RelationshipFilter::blood());
        assert_eq!(chain, vec![RelationLabel::ParentOf]);
        assert_eq!(
            describe_path(&ctx, &path, &chain),
            "Unknown is the parent of Unknown"
        );
    }

    #[test]
    fn test_detailed_path_steps() {
        let ctx = family_context();
        let path = ids(&["B", "J"]);
        let chain = relationship_chain(&ctx, &path, &RelationshipFilter::blood());
        assert_eq!(
            detailed_path(&ctx, &path, &chain),
            vec!["Bob -> son of -> John"]
        );
    }
}
