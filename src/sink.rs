use std::io::{BufWriter, Write};

use camino::Utf8Path;
use serde::Serialize;

use crate::domain::{Ontology, Term};
use crate::error::KeggError;
use crate::store::Store;

pub trait OntologySink {
    fn write(
        &mut self,
        ontology: &Ontology,
        terms: &mut dyn Iterator<Item = Term>,
    ) -> Result<usize, KeggError>;
}

pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<(), KeggError> {
        serde_json::to_writer(&mut self.writer, value)
            .map_err(|err| KeggError::Serialize(err.to_string()))?;
        self.writer
            .write_all(b"\n")
            .map_err(|err| KeggError::Filesystem(err.to_string()))
    }
}

impl<W: Write> OntologySink for JsonLinesSink<W> {
    fn write(
        &mut self,
        ontology: &Ontology,
        terms: &mut dyn Iterator<Item = Term>,
    ) -> Result<usize, KeggError> {
        self.write_line(ontology)?;
        let mut count = 0;
        for term in terms {
            self.write_line(&term)?;
            count += 1;
        }
        self.writer
            .flush()
            .map_err(|err| KeggError::Filesystem(err.to_string()))?;
        Ok(count)
    }
}

pub fn write_default(
    dest: &Utf8Path,
    ontology: &Ontology,
    terms: &mut dyn Iterator<Item = Term>,
) -> Result<usize, KeggError> {
    let temp = Store::temp_sibling(dest)?;
    let count = {
        let mut sink = JsonLinesSink::new(BufWriter::new(temp.as_file()));
        sink.write(ontology, terms)?
    };
    Store::persist(temp, dest)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::ontology;
    use crate::domain::{KEGG_PATHWAY_PREFIX, Reference};

    #[test]
    fn header_then_one_line_per_term() {
        let terms = vec![
            Term::new(Reference::new(KEGG_PATHWAY_PREFIX, "map00010").with_name("Glycolysis")),
            Term::new(Reference::new(KEGG_PATHWAY_PREFIX, "map00020")),
        ];
        let mut sink = JsonLinesSink::new(Vec::new());
        let count = sink.write(&ontology(), &mut terms.into_iter()).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        let header: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(header["prefix"], "kegg.pathway");
        assert_eq!(header["typedefs"].as_array().unwrap().len(), 4);
        let first: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(first["reference"]["identifier"], "map00010");
        assert_eq!(first["reference"]["name"], "Glycolysis");
    }
}
