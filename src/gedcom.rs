//! Thin GEDCOM converter: INDI/FAM records to and from the normalized
//! graph. Deliberately independent of the layout core — it only produces
//! and consumes `Graph`.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::ir::{Graph, RelationKind};
use crate::layout::infer_families;

static LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s+(?:@([^@]+)@\s+)?([A-Za-z_]+)(?:\s+(.*))?$").unwrap());
static XREF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@([^@]+)@").unwrap());

#[derive(Debug, Error)]
pub enum GedcomError {
    #[error("no individual records found")]
    Empty,
}

#[derive(Debug, Default)]
struct FamRecord {
    husband: Option<String>,
    wife: Option<String>,
    children: Vec<String>,
}

enum Context {
    None,
    Individual(String),
    Family(usize),
}

enum EventContext {
    None,
    Birth,
    Death,
}

/// Parse a GEDCOM document into a graph. Lines that do not match the level
/// grammar, and references to missing individuals, are skipped; the only
/// failure is a document with no individual records at all.
pub fn parse_gedcom(input: &str) -> Result<Graph, GedcomError> {
    let mut graph = Graph::new();
    let mut fams: Vec<FamRecord> = Vec::new();
    let mut context = Context::None;
    let mut event = EventContext::None;

    for raw in input.lines() {
        let Some(caps) = LINE_RE.captures(raw.trim()) else {
            continue;
        };
        let level = &caps[1];
        let xref = caps.get(2).map(|m| m.as_str().to_string());
        let tag = caps[3].to_ascii_uppercase();
        let value = caps.get(4).map(|m| m.as_str().trim()).unwrap_or("");

        if level == "0" {
            event = EventContext::None;
            context = match (tag.as_str(), xref) {
                ("INDI", Some(id)) => {
                    graph.ensure_person(&id, None);
                    Context::Individual(id)
                }
                ("FAM", _) => {
                    fams.push(FamRecord::default());
                    Context::Family(fams.len() - 1)
                }
                _ => Context::None,
            };
            continue;
        }

        match &context {
            Context::Individual(id) => match (level, tag.as_str()) {
                ("1", "NAME") => {
                    let name = value.replace('/', " ");
                    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
                    graph.ensure_person(id, Some(name));
                }
                ("1", "SEX") => {
                    set_attribute(&mut graph, id, "sex", value);
                }
                ("1", "BIRT") => event = EventContext::Birth,
                ("1", "DEAT") => event = EventContext::Death,
                ("2", "DATE") => match event {
                    EventContext::Birth => set_attribute(&mut graph, id, "birth_date", value),
                    EventContext::Death => set_attribute(&mut graph, id, "death_date", value),
                    EventContext::None => {}
                },
                ("2", "PLAC") => match event {
                    EventContext::Birth => set_attribute(&mut graph, id, "birth_place", value),
                    EventContext::Death => set_attribute(&mut graph, id, "death_place", value),
                    EventContext::None => {}
                },
                _ => {}
            },
            Context::Family(index) => {
                if level != "1" {
                    continue;
                }
                let Some(reference) = XREF_RE
                    .captures(value)
                    .map(|c| c[1].to_string())
                else {
                    continue;
                };
                let fam = &mut fams[*index];
                match tag.as_str() {
                    "HUSB" => fam.husband = Some(reference),
                    "WIFE" => fam.wife = Some(reference),
                    "CHIL" => fam.children.push(reference),
                    _ => {}
                }
            }
            Context::None => {}
        }
    }

    if graph.persons.is_empty() {
        return Err(GedcomError::Empty);
    }

    for fam in &fams {
        let parents: Vec<&String> = [fam.husband.as_ref(), fam.wife.as_ref()]
            .into_iter()
            .flatten()
            .collect();
        if let [a, b] = parents.as_slice() {
            graph.add_relationship(a.as_str(), b.as_str(), RelationKind::Partnership);
        }
        for child in &fam.children {
            for parent in &parents {
                graph.add_relationship(parent.as_str(), child, RelationKind::ParentChild);
            }
        }
    }

    Ok(graph)
}

fn set_attribute(graph: &mut Graph, id: &str, key: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    if let Some(person) = graph.persons.get_mut(id) {
        person
            .attributes
            .insert(key.to_string(), serde_json::Value::String(value.to_string()));
    }
}

/// Export a graph as minimal GEDCOM. Families are derived from the inferred
/// nuclear units plus childless partner pairs.
pub fn export_gedcom(graph: &Graph) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("0 HEAD".to_string());
    lines.push("1 SOUR FamilyAtlas".to_string());
    lines.push("1 CHAR UTF-8".to_string());

    let ids = graph.person_ids();
    let xref = |id: &str| -> String {
        let index = ids.iter().position(|v| v == id).unwrap_or(0);
        format!("@I{}@", index + 1)
    };

    for id in &ids {
        let Some(person) = graph.persons.get(id) else {
            continue;
        };
        lines.push(format!("0 {} INDI", xref(id)));
        lines.push(format!("1 NAME {}", person.display_name));
        if let Some(sex) = person.attributes.get("sex").and_then(|v| v.as_str()) {
            lines.push(format!("1 SEX {sex}"));
        }
        let birth_date = person.attributes.get("birth_date").and_then(|v| v.as_str());
        let birth_place = person.attributes.get("birth_place").and_then(|v| v.as_str());
        if birth_date.is_some() || birth_place.is_some() {
            lines.push("1 BIRT".to_string());
            if let Some(date) = birth_date {
                lines.push(format!("2 DATE {date}"));
            }
            if let Some(place) = birth_place {
                lines.push(format!("2 PLAC {place}"));
            }
        }
        let death_date = person.attributes.get("death_date").and_then(|v| v.as_str());
        let death_place = person.attributes.get("death_place").and_then(|v| v.as_str());
        if death_date.is_some() || death_place.is_some() {
            lines.push("1 DEAT".to_string());
            if let Some(date) = death_date {
                lines.push(format!("2 DATE {date}"));
            }
            if let Some(place) = death_place {
                lines.push(format!("2 PLAC {place}"));
            }
        }
    }

    let families = infer_families(graph);
    let mut fam_count = 0usize;
    let mut emitted_pairs: Vec<(String, String)> = Vec::new();
    for family in &families.families {
        fam_count += 1;
        lines.push(format!("0 @F{fam_count}@ FAM"));
        if let Some(first) = family.parents.first() {
            lines.push(format!("1 HUSB {}", xref(first)));
        }
        if let Some(second) = family.parents.get(1) {
            lines.push(format!("1 WIFE {}", xref(second)));
            let mut pair = (family.parents[0].clone(), second.clone());
            if pair.0 > pair.1 {
                std::mem::swap(&mut pair.0, &mut pair.1);
            }
            emitted_pairs.push(pair);
        }
        for child in &family.children {
            lines.push(format!("1 CHIL {}", xref(child)));
        }
    }
    for (person, partners) in &families.partners {
        for partner in partners {
            if person.as_str() >= partner.as_str() {
                continue;
            }
            let pair = (person.clone(), partner.clone());
            if emitted_pairs.contains(&pair) {
                continue;
            }
            fam_count += 1;
            lines.push(format!("0 @F{fam_count}@ FAM"));
            lines.push(format!("1 HUSB {}", xref(person)));
            lines.push(format!("1 WIFE {}", xref(partner)));
        }
    }

    lines.push("0 TRLR".to_string());
    lines.join("\n")
}
