use crate::domain::{
    KEGG_GENES_PREFIX, KEGG_GENOME_PREFIX, KEGG_PATHWAY_PREFIX, NCBITAXON_PREFIX, Reference,
};
use crate::error::KeggError;

pub const PATHWAY_MARKER: &str = "path:";

const REFERENCE_MAP_SEGMENT: &str = "map";

pub fn strip_marker<'a>(raw: &'a str, marker: &str) -> &'a str {
    raw.strip_prefix(marker).unwrap_or(raw)
}

pub fn pathway_code(raw: &str) -> &str {
    strip_marker(raw.trim(), PATHWAY_MARKER)
}

/// `hsa00010` becomes `map00010`. The suffix starts at the first numeric
/// character in the Unicode sense, not only ASCII digits.
pub fn generic_map_code(code: &str) -> Result<String, KeggError> {
    let start = code
        .find(char::is_numeric)
        .ok_or_else(|| KeggError::MalformedIdentifier(code.to_string()))?;
    Ok(format!("{REFERENCE_MAP_SEGMENT}{}", &code[start..]))
}

pub fn pathway_reference(raw: &str, name: Option<&str>) -> Reference {
    let reference = Reference::new(KEGG_PATHWAY_PREFIX, pathway_code(raw));
    match name {
        Some(name) => reference.with_name(name),
        None => reference,
    }
}

pub fn reference_map(raw: &str) -> Result<Reference, KeggError> {
    let code = generic_map_code(pathway_code(raw))?;
    Ok(Reference::new(KEGG_PATHWAY_PREFIX, code))
}

pub fn gene_reference(gene_id: &str) -> Reference {
    Reference::new(KEGG_GENES_PREFIX, gene_id.trim())
}

pub fn genome_reference(code: &str, name: &str) -> Reference {
    Reference::new(KEGG_GENOME_PREFIX, code).with_name(name)
}

pub fn taxon_reference(taxonomy_id: &str) -> Reference {
    Reference::new(NCBITAXON_PREFIX, taxonomy_id)
}
