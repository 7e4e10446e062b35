use crate::domain::model::{Structure, StructureSet};

fn same_id(a: &str, b: &str) -> bool {
    a.to_uppercase() == b.to_uppercase()
}

fn find_by_id<'a>(structure_set: &'a StructureSet, id: &str) -> Option<&'a Structure> {
    structure_set.structures.iter().find(|s| same_id(&s.id, id))
}

/// Last structure whose first external code equals `code`.
fn find_last_by_code<'a>(structure_set: &'a StructureSet, code: &str) -> Option<&'a Structure> {
    structure_set
        .structures
        .iter()
        .rev()
        .find(|s| s.primary_code().is_some_and(|c| same_id(c, code)))
}

/// Maps a declared structure identity to a contoured structure.
///
/// Precedence is exact id, then each alias in order. When an alias finds
/// nothing, or only an empty structure, the codes are searched for that
/// alias before moving on, taking the last structure carrying the code.
/// Every lookup overwrites the working candidate, so the result is whatever
/// the final lookup produced. An empty candidate resolves to `None`.
pub fn resolve<'a>(
    structure_set: &'a StructureSet,
    id: &str,
    aliases: &[String],
    codes: &[String],
) -> Option<&'a Structure> {
    let mut candidate = find_by_id(structure_set, id);

    if candidate.is_none() {
        for alias in aliases {
            candidate = find_by_id(structure_set, alias);
            if candidate.is_some_and(|s| !s.is_empty) {
                break;
            }

            for code in codes {
                candidate = find_last_by_code(structure_set, code);
                if candidate.is_some() {
                    break;
                }
            }
        }
    }

    match candidate {
        Some(structure) if structure.is_empty => {
            tracing::debug!("Structure {} for '{}' is empty", structure.id, id);
            None
        }
        other => other,
    }
}
