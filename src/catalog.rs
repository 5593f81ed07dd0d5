use std::io::BufRead;

use crate::domain::Term;
use crate::error::KeggError;
use crate::resolver::{pathway_code, pathway_reference};
use crate::source::PathwayCatalog;

pub fn parse_pathway_catalog<R: BufRead>(
    reader: R,
    label: &str,
) -> Result<Vec<(String, String)>, KeggError> {
    let mut entries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| KeggError::Filesystem(err.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (identifier, name) =
            trimmed
                .split_once('\t')
                .ok_or_else(|| KeggError::MalformedLine {
                    path: label.to_string(),
                    line_number: index + 1,
                    line: line.clone(),
                })?;
        entries.push((pathway_code(identifier).to_string(), name.trim().to_string()));
    }
    Ok(entries)
}

pub fn map_terms<C: PathwayCatalog + ?Sized>(catalog: &C) -> Result<Vec<Term>, KeggError> {
    let terms = catalog
        .pathways()?
        .into_iter()
        .map(|(identifier, name)| Term::new(pathway_reference(&identifier, Some(&name))))
        .collect();
    Ok(terms)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    struct StaticCatalog(Vec<(String, String)>);

    impl PathwayCatalog for StaticCatalog {
        fn pathways(&self) -> Result<Vec<(String, String)>, KeggError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenCatalog;

    impl PathwayCatalog for BrokenCatalog {
        fn pathways(&self) -> Result<Vec<(String, String)>, KeggError> {
            Err(KeggError::KeggHttp {
                url: "https://rest.kegg.jp/list/pathway".to_string(),
                message: "connection reset".to_string(),
            })
        }
    }

    #[test]
    fn parse_catalog_strips_marker() {
        let content = "path:map00010\tGlycolysis / Gluconeogenesis\nmap00020\tCitrate cycle (TCA cycle)\n";
        let entries = parse_pathway_catalog(content.as_bytes(), "list.tsv").unwrap();
        assert_eq!(
            entries,
            vec![
                ("map00010".to_string(), "Glycolysis / Gluconeogenesis".to_string()),
                ("map00020".to_string(), "Citrate cycle (TCA cycle)".to_string()),
            ]
        );
    }

    #[test]
    fn parse_catalog_rejects_line_without_tab() {
        let err = parse_pathway_catalog("map00010 Glycolysis\n".as_bytes(), "list.tsv").unwrap_err();
        assert_matches!(err, KeggError::MalformedLine { line_number: 1, .. });
    }

    #[test]
    fn map_terms_keep_order_and_have_no_edges() {
        let catalog = StaticCatalog(vec![
            ("map00020".to_string(), "Citrate cycle".to_string()),
            ("map00010".to_string(), "Glycolysis".to_string()),
        ]);
        let terms = map_terms(&catalog).unwrap();
        let ids = terms.iter().map(Term::identifier).collect::<Vec<_>>();
        assert_eq!(ids, vec!["map00020", "map00010"]);
        assert!(terms.iter().all(|term| term.relationships.is_empty()));
        assert_eq!(terms[1].reference.name.as_deref(), Some("Glycolysis"));
    }

    #[test]
    fn map_terms_propagate_catalog_failure() {
        assert_matches!(map_terms(&BrokenCatalog), Err(KeggError::KeggHttp { .. }));
    }
}
