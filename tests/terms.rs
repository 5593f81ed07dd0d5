use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use kegg_pathway_obo::api::KeggApi;
use kegg_pathway_obo::assembler::{RunSummary, iter_terms, ontology};
use kegg_pathway_obo::domain::{KEGG_GENES_PREFIX, Reference, Relation, Term};
use kegg_pathway_obo::error::KeggError;
use kegg_pathway_obo::kegg::KeggClient;
use kegg_pathway_obo::sink::write_default;
use kegg_pathway_obo::store::Store;

#[derive(Default)]
struct MockKegg {
    pathways: String,
    genomes: String,
    files: HashMap<String, Result<String, u16>>,
    calls: Mutex<Vec<String>>,
}

impl MockKegg {
    fn serve(&self, key: &str, destination: &Path) -> Result<(), KeggError> {
        self.calls.lock().unwrap().push(key.to_string());
        let url = format!("https://rest.kegg.jp/{key}");
        match self.files.get(key) {
            Some(Ok(body)) => write(destination, body),
            Some(Err(404)) | None => Err(KeggError::NotFound { url }),
            Some(Err(status)) => Err(KeggError::KeggStatus {
                status: *status,
                url,
                message: "server error".to_string(),
            }),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn write(destination: &Path, body: &str) -> Result<(), KeggError> {
    std::fs::write(destination, body).map_err(|err| KeggError::Filesystem(err.to_string()))
}

impl KeggClient for MockKegg {
    fn download_pathway_list(&self, destination: &Path) -> Result<(), KeggError> {
        self.calls.lock().unwrap().push("list/pathway".to_string());
        write(destination, &self.pathways)
    }

    fn download_genome_list(&self, destination: &Path) -> Result<(), KeggError> {
        self.calls.lock().unwrap().push("list/genome".to_string());
        write(destination, &self.genomes)
    }

    fn download_genome_pathway_list(
        &self,
        code: &str,
        destination: &Path,
    ) -> Result<(), KeggError> {
        self.serve(&format!("list/pathway/{code}"), destination)
    }

    fn download_genome_pathway_links(
        &self,
        code: &str,
        destination: &Path,
    ) -> Result<(), KeggError> {
        self.serve(&format!("link/pathway/{code}"), destination)
    }
}

fn scenario() -> MockKegg {
    let mut files = HashMap::new();
    files.insert(
        "list/pathway/hsa".to_string(),
        Ok("path:hsa00010\tGlycolysis / Gluconeogenesis\n".to_string()),
    );
    files.insert(
        "link/pathway/hsa".to_string(),
        Ok("b:123\tpath:hsa00010\nb:045\tpath:hsa00010\n".to_string()),
    );
    files.insert("list/pathway/xyz".to_string(), Err(404));
    files.insert("link/pathway/xyz".to_string(), Err(404));
    files.insert("list/pathway/bad".to_string(), Err(502));
    files.insert(
        "list/pathway/eco".to_string(),
        Ok("path:eco00010\tGlycolysis\n".to_string()),
    );
    files.insert(
        "link/pathway/eco".to_string(),
        Ok("eco:b1\tpath:eco99999\n".to_string()),
    );
    MockKegg {
        pathways: "path:map00010\tGlycolysis\n".to_string(),
        genomes: [
            "T01001\thsa, HUMAN, 9606; Homo sapiens (human)",
            "T09999\txyz, 1234; Unpublished organism",
            "T09998\tbad, 4321; Flaky organism",
            "T00007\teco; Escherichia coli",
        ]
        .join("\n"),
        files,
        calls: Mutex::new(Vec::new()),
    }
}

fn temp_store() -> (tempfile::TempDir, Store) {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().join("cache")).unwrap();
    (temp, Store::new_with_root(root))
}

fn targets(term: &Term, relation: Relation) -> Vec<String> {
    term.targets(relation).map(Reference::curie).collect()
}

#[test]
fn end_to_end_human_glycolysis() {
    let (_temp, store) = temp_store();
    let api = KeggApi::new(store, scenario());

    let terms = iter_terms(&api).unwrap().collect::<Vec<_>>();
    let ids = terms.iter().map(Term::identifier).collect::<Vec<_>>();
    assert_eq!(ids, vec!["map00010", "hsa00010", "eco00010"]);

    let map = &terms[0];
    assert!(map.relationships.is_empty());
    assert_eq!(map.reference.name.as_deref(), Some("Glycolysis"));

    let human = &terms[1];
    assert_eq!(
        human.reference.name.as_deref(),
        Some("Glycolysis / Gluconeogenesis")
    );
    assert_eq!(
        targets(human, Relation::SpeciesSpecific),
        vec!["kegg.pathway:map00010"]
    );
    assert_eq!(targets(human, Relation::InKeggTaxon), vec!["kegg.genome:hsa"]);
    assert_eq!(targets(human, Relation::InTaxon), vec!["ncbitaxon:9606"]);
    assert_eq!(
        targets(human, Relation::HasPart),
        vec!["kegg.genes:b:045", "kegg.genes:b:123"]
    );
    assert_eq!(human.species.as_deref(), Some("9606"));
}

#[test]
fn missing_and_failing_genomes_do_not_stop_the_run() {
    let (_temp, store) = temp_store();
    let api = KeggApi::new(store, scenario());

    let mut stream = iter_terms(&api).unwrap();
    let terms = stream.by_ref().collect::<Vec<_>>();
    assert!(terms.iter().all(|term| !term.identifier().starts_with("xyz")));
    assert!(terms.iter().all(|term| !term.identifier().starts_with("bad")));

    let eco = terms.iter().find(|term| term.identifier() == "eco00010").unwrap();
    assert!(targets(eco, Relation::InTaxon).is_empty());
    assert!(targets(eco, Relation::HasPart).is_empty());

    assert_eq!(
        stream.summary(),
        RunSummary {
            map_terms: 1,
            genomes_joined: 2,
            genomes_missing: 1,
            genomes_failed: 1,
            unresolved_links: 1,
            skipped_lines: 0,
            terms: 3,
        }
    );
}

#[test]
fn cached_files_are_not_downloaded_twice() {
    let (_temp, store) = temp_store();
    let api = KeggApi::new(store, scenario());

    let first = iter_terms(&api).unwrap().count();
    let after_first = api_calls(&api);
    let second = iter_terms(&api).unwrap().count();
    let after_second = api_calls(&api);

    assert_eq!(first, second);
    // Only the genomes without a cached copy are asked for again.
    let repeated = after_second[after_first.len()..].to_vec();
    assert_eq!(
        repeated,
        vec!["list/pathway/xyz".to_string(), "list/pathway/bad".to_string()]
    );
}

fn api_calls(api: &KeggApi<MockKegg>) -> Vec<String> {
    api.client().calls()
}

#[test]
fn catalog_failure_propagates() {
    struct DownKegg;

    impl KeggClient for DownKegg {
        fn download_pathway_list(&self, _destination: &Path) -> Result<(), KeggError> {
            Err(KeggError::KeggHttp {
                url: "https://rest.kegg.jp/list/pathway".to_string(),
                message: "connection refused".to_string(),
            })
        }

        fn download_genome_list(&self, _destination: &Path) -> Result<(), KeggError> {
            Ok(())
        }

        fn download_genome_pathway_list(
            &self,
            _code: &str,
            _destination: &Path,
        ) -> Result<(), KeggError> {
            Ok(())
        }

        fn download_genome_pathway_links(
            &self,
            _code: &str,
            _destination: &Path,
        ) -> Result<(), KeggError> {
            Ok(())
        }
    }

    let (_temp, store) = temp_store();
    let api = KeggApi::new(store, DownKegg);
    let err = iter_terms(&api).err().unwrap();
    assert_matches!(err, KeggError::KeggHttp { .. });
    assert!(!Store::exists(&api.store().pathway_list_path()));
}

#[test]
fn default_export_writes_every_term() {
    let (_temp, store) = temp_store();
    let output = store.default_output_path();
    let api = KeggApi::new(store, scenario());

    let mut stream = iter_terms(&api).unwrap();
    let written = write_default(&output, &ontology(), &mut stream).unwrap();
    assert_eq!(written, 3);

    let content = std::fs::read_to_string(output.as_std_path()).unwrap();
    assert_eq!(content.lines().count(), 4);
    assert!(content.contains(KEGG_GENES_PREFIX));
}
