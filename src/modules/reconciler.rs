use std::collections::{HashMap, HashSet};

use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::{info, warn};
use regex::Regex;

use crate::modules::models::car_generation::CarGeneration;
use crate::modules::models::car_make::CarMake;
use crate::modules::models::car_model::CarModel;

/// ordered (pattern, family label) table for one brand, first match wins.
pub type FamilyTable = Vec<(Regex, &'static str)>;

/// # the per-brand pattern tables
/// imported model rows carry free-text names ("1998 BMW 3 Series Sedan",
/// "E46 3 Series Touring"), these map them onto one canonical family label.
/// order matters: "M3" has to win before the broader "3 Series" pattern.
pub fn family_patterns() -> HashMap<&'static str, FamilyTable> {
    let tables: Vec<(&'static str, Vec<(&'static str, &'static str)>)> = vec![
        (
            "bmw",
            vec![
                (r"(?i)\bM3\b", "M3"),
                (r"(?i)\bM5\b", "M5"),
                (r"(?i)\b1[\s-]?Series\b|\bE8[127]\b|\bF2[01]\b", "1 Series"),
                (r"(?i)\b3[\s-]?Series\b|\bE(21|30|36|46|9[013])\b|\bF3[01]\b|\bG2[01]\b", "3 Series"),
                (r"(?i)\b5[\s-]?Series\b|\bE(28|34|39|60|61)\b|\bF1[01]\b|\bG3[01]\b", "5 Series"),
            ],
        ),
        (
            "mercedes-benz",
            vec![
                (r"(?i)\bC[\s-]?Class\b|\bW20[234]\b", "C-Class"),
                (r"(?i)\bE[\s-]?Class\b|\bW21[0234]\b", "E-Class"),
                (r"(?i)\bS[\s-]?Class\b|\bW22[01]\b|\bW14[01]\b", "S-Class"),
            ],
        ),
        (
            "audi",
            vec![
                (r"(?i)\bRS4\b", "RS4"),
                (r"(?i)\bA4\b", "A4"),
                (r"(?i)\bA6\b", "A6"),
                (r"(?i)\bTT\b", "TT"),
            ],
        ),
        (
            "volkswagen",
            vec![
                (r"(?i)\bGolf\b", "Golf"),
                (r"(?i)\bPolo\b", "Polo"),
                (r"(?i)\bPassat\b", "Passat"),
            ],
        ),
        (
            "porsche",
            vec![
                (r"(?i)\b911\b|\b99[2-7]\b", "911"),
                (r"(?i)\bCayman\b|\b718\b", "718 Cayman"),
            ],
        ),
    ];

    tables
        .into_iter()
        .map(|(brand, rows)| {
            let compiled = rows
                .into_iter()
                .map(|(pattern, family)| {
                    (
                        Regex::new(pattern).expect("invalid model family pattern"),
                        family,
                    )
                })
                .collect();
            (brand, compiled)
        })
        .collect()
}

/// match a model onto a family label. the model's own name is tried first,
/// then each of its generations' display names.
pub fn match_family<'t>(
    table: &'t [(Regex, &'static str)],
    model_name: &str,
    generation_names: &[String],
) -> Option<&'t str> {
    for (pattern, family) in table {
        if pattern.is_match(model_name) {
            return Some(family);
        }
        if generation_names.iter().any(|name| pattern.is_match(name)) {
            return Some(family);
        }
    }

    None
}

/// group a brand's models by matched family label. unmatched models are left
/// alone. a group only triggers a merge when it holds more than one model, so
/// an already collapsed catalog produces no further work.
pub fn group_by_family<'t>(
    table: &'t [(Regex, &'static str)],
    models: &[(CarModel, Vec<String>)],
) -> Vec<(&'t str, Vec<CarModel>)> {
    let mut groups: HashMap<&str, Vec<CarModel>> = HashMap::new();
    for (model, generation_names) in models {
        if let Some(family) = match_family(table, &model.name, generation_names) {
            groups.entry(family).or_default().push(model.clone());
        }
    }

    let mut groups: Vec<(&str, Vec<CarModel>)> = groups.into_iter().collect();
    groups.sort_by_key(|(family, _)| *family);
    groups
}

/// pick a generation name that is free on the canonical model. collisions get
/// the source model's name appended, and a counter when still taken.
pub fn disambiguate_name(taken: &HashSet<String>, name: &str, source_model: &str) -> String {
    let mut candidate = format!("{} ({})", name, source_model);
    let mut counter = 2;
    while taken.contains(&candidate) {
        candidate = format!("{} ({} {})", name, source_model, counter);
        counter += 1;
    }

    candidate
}

/// the row a group collapses onto, an existing model whose name already is
/// the family label or a fresh one.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalTarget {
    Existing(i32),
    Create { name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMove {
    pub generation_id: i32,
    pub renamed: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergePlan {
    pub canonical: CanonicalTarget,
    pub moves: Vec<PlannedMove>,
    pub delete_model_ids: Vec<i32>,
}

/// # decide how a group of same-family models collapses
/// pure over the loaded rows: picks (or invents) the canonical model, lists
/// every generation move with its collision rename, and lists the emptied
/// source models to delete. the database writes happen in [`merge_group`].
pub fn plan_merge(family: &str, members: &[(CarModel, Vec<CarGeneration>)]) -> MergePlan {
    let canonical_member = members
        .iter()
        .find(|(model, _)| model.name.eq_ignore_ascii_case(family));

    let (canonical, canonical_id, mut taken) = match canonical_member {
        Some((model, generations)) => (
            CanonicalTarget::Existing(model.id),
            Some(model.id),
            generations
                .iter()
                .map(|generation| generation.name.clone())
                .collect::<HashSet<String>>(),
        ),
        None => (
            CanonicalTarget::Create {
                name: family.to_string(),
            },
            None,
            HashSet::new(),
        ),
    };

    let mut moves = Vec::new();
    let mut delete_model_ids = Vec::new();

    for (model, generations) in members {
        if Some(model.id) == canonical_id {
            continue;
        }

        for generation in generations {
            let renamed = if taken.contains(&generation.name) {
                Some(disambiguate_name(&taken, &generation.name, &model.name))
            } else {
                None
            };

            taken.insert(
                renamed
                    .clone()
                    .unwrap_or_else(|| generation.name.clone()),
            );
            moves.push(PlannedMove {
                generation_id: generation.id,
                renamed,
            });
        }

        delete_model_ids.push(model.id);
    }

    MergePlan {
        canonical,
        moves,
        delete_model_ids,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReconcileSummary {
    pub families_merged: usize,
    pub generations_moved: usize,
    pub models_deleted: usize,
    pub groups_skipped: usize,
}

/// # collapse loosely named model rows into canonical families
/// one offline batch pass over the whole catalog. a failing group is logged
/// and skipped so the rest of the brands still make progress. the
/// read-move-delete sequence is not transactional, concurrent catalog writers
/// can race it.
pub fn run(conn: &mut PgConnection) -> QueryResult<ReconcileSummary> {
    let patterns = family_patterns();
    let mut summary = ReconcileSummary::default();

    for make in CarMake::get_all(conn)? {
        let table = match patterns.get(make.name.to_lowercase().as_str()) {
            Some(table) => table,
            None => continue,
        };

        info!(target:"modules/reconciler:run", "reconciling make {}", make.name);
        println!("reconciling {}", make.name);

        let mut models: Vec<(CarModel, Vec<String>)> = Vec::new();
        for model in CarModel::from_make(conn, &make)? {
            let generation_names = CarGeneration::from_model(conn, &model)?
                .iter()
                .map(|generation| generation.name.clone())
                .collect();
            models.push((model, generation_names));
        }

        for (family, group) in group_by_family(table, &models) {
            if group.len() < 2 {
                continue;
            }

            match merge_group(conn, &make, family, &group, &mut summary) {
                Ok(()) => {
                    summary.families_merged += 1;
                    println!("  merged {} models into {}", group.len(), family);
                }
                Err(error) => {
                    warn!(target:"modules/reconciler:run",
                        "skipping family {} of {}: {}", family, make.name, error);
                    summary.groups_skipped += 1;
                }
            }
        }
    }

    // cleanup pass: drop whatever is left without generations
    for model in CarModel::get_all(conn)? {
        if model.generation_count(conn)? == 0 {
            match model.delete(conn) {
                Ok(_) => summary.models_deleted += 1,
                Err(error) => {
                    warn!(target:"modules/reconciler:run",
                        "could not delete empty model {}: {}", model.name, error);
                }
            }
        }
    }

    Ok(summary)
}

/// thin executor around [`plan_merge`]: loads the group's generations, then
/// applies the planned creates, reparents and deletes in order.
fn merge_group(
    conn: &mut PgConnection,
    make: &CarMake,
    family: &str,
    group: &[CarModel],
    summary: &mut ReconcileSummary,
) -> QueryResult<()> {
    let mut members: Vec<(CarModel, Vec<CarGeneration>)> = Vec::new();
    for model in group {
        members.push((model.clone(), CarGeneration::from_model(conn, model)?));
    }

    let plan = plan_merge(family, &members);

    let canonical_id = match &plan.canonical {
        CanonicalTarget::Existing(id) => *id,
        CanonicalTarget::Create { name } => CarModel::new(conn, make.id, name)?.id,
    };

    let generations_by_id: HashMap<i32, &CarGeneration> = members
        .iter()
        .flat_map(|(_, generations)| generations.iter())
        .map(|generation| (generation.id, generation))
        .collect();

    for planned in &plan.moves {
        if let Some(generation) = generations_by_id.get(&planned.generation_id) {
            generation.reparent(conn, canonical_id, planned.renamed.as_deref())?;
            summary.generations_moved += 1;
        }
    }

    for (model, _) in members
        .iter()
        .filter(|(model, _)| plan.delete_model_ids.contains(&model.id))
    {
        // a delete blocked by residual references leaves the model in place,
        // the run continues
        match model.delete(conn) {
            Ok(_) => summary.models_deleted += 1,
            Err(error) => {
                warn!(target:"modules/reconciler:merge_group",
                    "could not delete source model {}: {}", model.name, error);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: i32, name: &str) -> CarModel {
        CarModel {
            id,
            make_id: 1,
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
        }
    }

    #[test]
    fn matches_model_name_against_brand_table() {
        let patterns = family_patterns();
        let bmw = patterns.get("bmw").unwrap();

        assert_eq!(match_family(bmw, "E46 3 Series Sedan", &[]), Some("3 Series"));
        assert_eq!(match_family(bmw, "1998 BMW 3-Series Touring", &[]), Some("3 Series"));
        assert_eq!(match_family(bmw, "Z8 Roadster", &[]), None);
    }

    #[test]
    fn narrower_family_wins_over_broader_one() {
        let patterns = family_patterns();
        let bmw = patterns.get("bmw").unwrap();

        // "M3" is listed before the chassis-code pattern of "3 Series"
        assert_eq!(match_family(bmw, "E46 M3 Coupe", &[]), Some("M3"));
    }

    #[test]
    fn falls_back_to_generation_names() {
        let patterns = family_patterns();
        let vw = patterns.get("volkswagen").unwrap();

        let generations = vec!["Golf Mk4 GTI".to_string()];
        assert_eq!(match_family(vw, "Unknown Import", &generations), Some("Golf"));
        assert_eq!(match_family(vw, "Unknown Import", &[]), None);
    }

    #[test]
    fn groups_matching_models_together() {
        let patterns = family_patterns();
        let bmw = patterns.get("bmw").unwrap();

        let models = vec![
            (model(1, "E46 3 Series Sedan"), Vec::new()),
            (model(2, "E46 3 Series Touring"), Vec::new()),
            (model(3, "E39 5 Series"), Vec::new()),
            (model(4, "Z8 Roadster"), Vec::new()),
        ];

        let groups = group_by_family(bmw, &models);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "3 Series");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "5 Series");
        assert_eq!(groups[1].1.len(), 1);
    }

    #[test]
    fn collapsed_catalog_produces_no_further_merges() {
        let patterns = family_patterns();
        let bmw = patterns.get("bmw").unwrap();

        // state after a successful run: one canonical model per family
        let models = vec![
            (model(10, "3 Series"), Vec::new()),
            (model(11, "5 Series"), Vec::new()),
        ];

        let groups = group_by_family(bmw, &models);
        assert!(groups.iter().all(|(_, group)| group.len() < 2));
    }

    fn generation(id: i32, model_id: i32, name: &str) -> CarGeneration {
        CarGeneration {
            id,
            model_id,
            name: name.to_string(),
            start_year: None,
            end_year: None,
        }
    }

    #[test]
    fn merge_plan_collapses_split_e46_models_onto_one_canonical() {
        // two E46 imports, no model is named "3 Series" yet
        let members = vec![
            (model(1, "E46 3 Series Sedan"), vec![generation(10, 1, "E46")]),
            (
                model(2, "E46 3 Series Touring"),
                vec![generation(11, 2, "E46")],
            ),
        ];

        let plan = plan_merge("3 Series", &members);

        assert_eq!(
            plan.canonical,
            CanonicalTarget::Create {
                name: "3 Series".to_string()
            }
        );
        // both generations end up on the canonical row, the colliding second
        // one under a disambiguated name, and both source models go away
        assert_eq!(
            plan.moves,
            vec![
                PlannedMove {
                    generation_id: 10,
                    renamed: None,
                },
                PlannedMove {
                    generation_id: 11,
                    renamed: Some("E46 (E46 3 Series Touring)".to_string()),
                },
            ]
        );
        assert_eq!(plan.delete_model_ids, vec![1, 2]);
    }

    #[test]
    fn merge_plan_reuses_an_existing_canonical_model() {
        let members = vec![
            (model(5, "3 Series"), vec![generation(50, 5, "E90")]),
            (model(6, "E46 3 Series"), vec![generation(60, 6, "E46")]),
        ];

        let plan = plan_merge("3 Series", &members);

        assert_eq!(plan.canonical, CanonicalTarget::Existing(5));
        assert_eq!(
            plan.moves,
            vec![PlannedMove {
                generation_id: 60,
                renamed: None,
            }]
        );
        // the canonical row itself is never deleted
        assert_eq!(plan.delete_model_ids, vec![6]);
    }

    #[test]
    fn merge_plan_renames_against_the_canonicals_own_generations() {
        let members = vec![
            (model(5, "3 Series"), vec![generation(50, 5, "E46")]),
            (model(6, "E46 3 Series"), vec![generation(60, 6, "E46")]),
        ];

        let plan = plan_merge("3 Series", &members);

        assert_eq!(
            plan.moves[0].renamed,
            Some("E46 (E46 3 Series)".to_string())
        );
    }

    #[test]
    fn collision_rename_appends_source_model_and_counter() {
        let mut taken: HashSet<String> = HashSet::new();
        taken.insert("Sedan".to_string());

        let renamed = disambiguate_name(&taken, "Sedan", "E46 3 Series Touring");
        assert_eq!(renamed, "Sedan (E46 3 Series Touring)");

        taken.insert(renamed);
        let renamed_again = disambiguate_name(&taken, "Sedan", "E46 3 Series Touring");
        assert_eq!(renamed_again, "Sedan (E46 3 Series Touring 2)");
    }
}
