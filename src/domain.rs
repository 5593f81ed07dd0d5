use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::resolver::taxon_reference;

pub const KEGG_PATHWAY_PREFIX: &str = "kegg.pathway";
pub const KEGG_GENES_PREFIX: &str = "kegg.genes";
pub const KEGG_GENOME_PREFIX: &str = "kegg.genome";
pub const NCBITAXON_PREFIX: &str = "ncbitaxon";

/// Identity of any entity in the graph. Two references are equal when their
/// prefix and identifier match; the display name is carried along but ignored.
#[derive(Debug, Clone, Serialize)]
pub struct Reference {
    pub prefix: String,
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Reference {
    pub fn new(prefix: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            identifier: identifier.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn curie(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix && self.identifier == other.identifier
    }
}

impl Eq for Reference {}

impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prefix.hash(state);
        self.identifier.hash(state);
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.identifier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeDef {
    pub prefix: &'static str,
    pub identifier: &'static str,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    InKeggTaxon,
    InTaxon,
    SpeciesSpecific,
    HasPart,
}

impl Relation {
    pub const ALL: [Relation; 4] = [
        Relation::InKeggTaxon,
        Relation::InTaxon,
        Relation::SpeciesSpecific,
        Relation::HasPart,
    ];

    pub fn typedef(self) -> TypeDef {
        match self {
            Relation::InKeggTaxon => TypeDef {
                prefix: "obo",
                identifier: "inKeggTaxon",
                name: "in KEGG taxon",
                definition: None,
            },
            Relation::InTaxon => TypeDef {
                prefix: "RO",
                identifier: "0002162",
                name: "in taxon",
                definition: None,
            },
            Relation::SpeciesSpecific => TypeDef {
                prefix: "obo",
                identifier: "speciesSpecific",
                name: "Species Specific",
                definition: Some(
                    "X speciesSpecific Y means that Y is a general phenomena, like a pathway, \
                     and X is the version that appears in a species. X should state which \
                     species with RO:0002162 (in taxon)",
                ),
            },
            Relation::HasPart => TypeDef {
                prefix: "BFO",
                identifier: "0000051",
                name: "has part",
                definition: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub relation: Relation,
    pub target: Reference,
}

#[derive(Debug, Clone, Serialize)]
pub struct Term {
    pub reference: Reference,
    pub relationships: Vec<Relationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
}

impl Term {
    pub fn new(reference: Reference) -> Self {
        Self {
            reference,
            relationships: Vec::new(),
            species: None,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.reference.identifier
    }

    pub fn append_relationship(&mut self, relation: Relation, target: Reference) {
        self.relationships.push(Relationship { relation, target });
    }

    pub fn set_species(&mut self, taxonomy_id: &str) {
        self.species = Some(taxonomy_id.to_string());
        self.append_relationship(Relation::InTaxon, taxon_reference(taxonomy_id));
    }

    pub fn targets(&self, relation: Relation) -> impl Iterator<Item = &Reference> {
        self.relationships
            .iter()
            .filter(move |rel| rel.relation == relation)
            .map(|rel| &rel.target)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Ontology {
    pub name: String,
    pub prefix: String,
    pub typedefs: Vec<TypeDef>,
    pub auto_generated_by: String,
    pub date: String,
}
