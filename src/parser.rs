//! Parsing tab-separated ontology, annotation, prediction and network files
//!
//! All files are plain text with one record per line and tab-separated
//! columns. Empty lines and lines starting with `#` are skipped. Lists of
//! ids are written as array literals, e.g. `{1,2,3}`.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::{GoError, GoResult};

/// Parses an array literal such as `{1,2,3}`
///
/// # Errors
///
/// [`GoError::InvalidInput`] if the value is not enclosed in braces and
/// any error of parsing the items
///
/// # Examples
///
/// ```
/// use gopredict::parser::parse_array;
/// use gopredict::GoTermId;
///
/// let ids: Vec<GoTermId> = parse_array("{1, 2,3}").unwrap();
/// assert_eq!(ids, vec![1u32.into(), 2u32.into(), 3u32.into()]);
///
/// let empty: Vec<GoTermId> = parse_array("{}").unwrap();
/// assert!(empty.is_empty());
///
/// assert!(parse_array::<GoTermId>("1,2").is_err());
/// ```
pub fn parse_array<'a, T>(value: &'a str) -> GoResult<Vec<T>>
where
    T: TryFrom<&'a str, Error = GoError>,
{
    let Some(inner) = value
        .trim()
        .strip_prefix('{')
        .and_then(|v| v.strip_suffix('}'))
    else {
        return Err(GoError::InvalidInput(format!("not an array: `{value}`")));
    };
    inner
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(T::try_from)
        .collect()
}

fn open<P: AsRef<Path>>(file: P) -> GoResult<BufReader<File>> {
    let filename = file.as_ref().display().to_string();
    let file = File::open(file).map_err(|_| GoError::CannotOpenFile(filename))?;
    Ok(BufReader::new(file))
}

/// Returns the next data line, skipping comments and empty lines
fn next_record<R: BufRead>(lines: &mut Lines<R>) -> Option<GoResult<String>> {
    for line in lines.by_ref() {
        match line {
            Ok(line) if line.trim().is_empty() || line.starts_with('#') => continue,
            Ok(line) => return Some(Ok(line)),
            Err(err) => return Some(Err(GoError::InvalidInput(err.to_string()))),
        }
    }
    None
}

/// Collects all records of a reader with `parse_line`
fn records<R: BufRead, T, F: Fn(&str) -> GoResult<T>>(reader: R, parse_line: F) -> GoResult<Vec<T>> {
    let mut lines = reader.lines();
    let mut records = Vec::new();
    while let Some(line) = next_record(&mut lines) {
        records.push(parse_line(&line?)?);
    }
    Ok(records)
}

/// Returns the next column or an error that contains the full line
fn column<'a, I: Iterator<Item = &'a str>>(cols: &mut I, line: &str) -> GoResult<&'a str> {
    cols.next()
        .ok_or_else(|| GoError::InvalidInput(line.to_string()))
}

/// Module to parse the GO term and term2term tables
pub(crate) mod ontology_tsv {
    use std::io::BufRead;
    use std::path::Path;

    use tracing::debug;

    use super::{column, open, records};
    use crate::ontology::{OntologySource, TermRecord};
    use crate::{GoError, GoResult, GoTermId};

    /// Parses a single line of the terms table
    ///
    /// ```text
    /// 8150    GO:0008150  biological_process  biological_process  0
    /// ```
    fn term_line(line: &str) -> GoResult<TermRecord> {
        let mut cols = line.split('\t');
        let id = GoTermId::try_from(column(&mut cols, line)?)?;
        let accession = column(&mut cols, line)?.trim().to_string();
        let name = column(&mut cols, line)?.trim().to_string();
        let term_type = column(&mut cols, line)?.trim().to_string();
        let obsolete = match column(&mut cols, line)?.trim() {
            "0" | "false" | "f" => false,
            "1" | "true" | "t" => true,
            _ => return Err(GoError::InvalidInput(line.to_string())),
        };
        Ok(TermRecord {
            id,
            accession,
            name,
            term_type,
            obsolete,
        })
    }

    /// Parses a single line of the term2term table
    ///
    /// ```text
    /// 8150    1234
    /// ```
    fn edge_line(line: &str) -> GoResult<(GoTermId, GoTermId)> {
        let mut cols = line.split('\t');
        let parent = GoTermId::try_from(column(&mut cols, line)?)?;
        let child = GoTermId::try_from(column(&mut cols, line)?)?;
        Ok((parent, child))
    }

    /// An [`OntologySource`] backed by two tab-separated tables
    ///
    /// - terms: `id, accession, name, term_type, is_obsolete`
    /// - edges: `parent, child`
    #[derive(Debug, Clone, Default)]
    pub struct TsvOntology {
        terms: Vec<TermRecord>,
        edges: Vec<(GoTermId, GoTermId)>,
    }

    impl TsvOntology {
        /// Reads both tables from files
        ///
        /// # Errors
        ///
        /// - [`GoError::CannotOpenFile`]: a file is not present or can't be opened
        /// - [`GoError::InvalidInput`]: a line has missing columns
        /// - [`GoError::ParseIntError`]: a line contains an invalid id
        pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(terms: P, edges: Q) -> GoResult<Self> {
            Self::from_readers(open(terms)?, open(edges)?)
        }

        /// Reads both tables from readers
        ///
        /// # Errors
        ///
        /// Same as [`TsvOntology::from_files`], without `CannotOpenFile`
        pub fn from_readers<R: BufRead, S: BufRead>(terms: R, edges: S) -> GoResult<Self> {
            let terms = records(terms, term_line)?;
            let edges = records(edges, edge_line)?;
            debug!("Read {} terms and {} edges", terms.len(), edges.len());
            Ok(Self { terms, edges })
        }
    }

    impl OntologySource for TsvOntology {
        fn terms(&self) -> GoResult<Vec<TermRecord>> {
            Ok(self.terms.clone())
        }

        fn edges(&self) -> GoResult<Vec<(GoTermId, GoTermId)>> {
            Ok(self.edges.clone())
        }
    }

    #[cfg(test)]
    mod test_ontology_parsing {
        use super::*;
        use crate::{Branch, GoDag};

        #[test]
        fn test_term_line() {
            let term = term_line("8150\tGO:0008150\tbiological_process\tbiological_process\t0")
                .expect("This line has the correct format");
            assert_eq!(term.id, 8150u32.into());
            assert_eq!(term.accession, "GO:0008150");
            assert!(!term.obsolete);
        }

        #[test]
        fn test_term_line_missing_column() {
            assert!(term_line("8150\tGO:0008150\tbiological_process\t0").is_err());
        }

        #[test]
        fn test_term_line_invalid_id() {
            assert!(term_line("GO:8150\tGO:0008150\tbp\tbiological_process\t0").is_err());
        }

        #[test]
        fn test_edge_line() {
            assert_eq!(edge_line("1\t2").unwrap(), (1u32.into(), 2u32.into()));
            assert!(edge_line("1").is_err());
        }

        #[test]
        fn test_readers() {
            let terms = "#id\taccession\tname\tterm_type\tis_obsolete\n\
                         1\tGO:0008150\tbiological_process\tbiological_process\t0\n\
                         2\tGO:0000002\tA\tbiological_process\t0\n\
                         3\tGO:0000003\tgone\tbiological_process\t1\n";
            let edges = "1\t2\n1\t3\n";
            let source = TsvOntology::from_readers(terms.as_bytes(), edges.as_bytes()).unwrap();
            let dag = GoDag::from_source(&source, Branch::BiologicalProcess).unwrap();
            assert_eq!(dag.len(), 2);
            assert_eq!(dag.depth(2u32.into()), Some(1));
        }

        #[test]
        fn test_missing_file() {
            let res = TsvOntology::from_files("tests/does_not_exist.tsv", "tests/term2term.tsv");
            assert!(matches!(res, Err(GoError::CannotOpenFile(_))));
        }

        #[test]
        fn test_files() {
            let source = TsvOntology::from_files("tests/terms.tsv", "tests/term2term.tsv").unwrap();
            let dag = GoDag::from_source(&source, Branch::BiologicalProcess).unwrap();
            assert!(dag.len() > 1);
        }
    }
}

/// Module to parse gene - GO term annotations
pub(crate) mod annotations_tsv {
    use std::io::BufRead;
    use std::path::Path;

    use super::{column, open, parse_array, records};
    use crate::annotations::{AnnotationSource, GeneRecord};
    use crate::{GeneId, GoResult};

    /// Parses a single line of the annotation table
    ///
    /// ```text
    /// 12  TP53    {6915,8283}
    /// ```
    fn gene_line(line: &str) -> GoResult<GeneRecord> {
        let mut cols = line.split('\t');
        let gene = GeneId::try_from(column(&mut cols, line)?)?;
        let name = column(&mut cols, line)?.trim().to_string();
        let terms = parse_array(column(&mut cols, line)?)?;
        Ok(GeneRecord { gene, name, terms })
    }

    /// An [`AnnotationSource`] backed by a tab-separated table
    ///
    /// Columns: `gene, gene_name, {go,go,...}`
    #[derive(Debug, Clone, Default)]
    pub struct TsvAnnotations {
        genes: Vec<GeneRecord>,
    }

    impl TsvAnnotations {
        /// Reads the annotation table from a file
        ///
        /// # Errors
        ///
        /// - [`crate::GoError::CannotOpenFile`]: the file is not present or can't be opened
        /// - [`crate::GoError::InvalidInput`]: a line has missing columns
        /// - [`crate::GoError::ParseIntError`]: a line contains an invalid id
        pub fn from_file<P: AsRef<Path>>(file: P) -> GoResult<Self> {
            Self::from_reader(open(file)?)
        }

        /// Reads the annotation table from a reader
        ///
        /// # Errors
        ///
        /// Same as [`TsvAnnotations::from_file`], without `CannotOpenFile`
        pub fn from_reader<R: BufRead>(reader: R) -> GoResult<Self> {
            Ok(Self {
                genes: records(reader, gene_line)?,
            })
        }
    }

    impl AnnotationSource for TsvAnnotations {
        fn genes(&self) -> GoResult<Vec<GeneRecord>> {
            Ok(self.genes.clone())
        }
    }

    #[cfg(test)]
    mod test_annotation_parsing {
        use super::*;

        #[test]
        fn test_gene_line() {
            let gene = gene_line("12\tTP53\t{6915, 8283}").expect("This line has the correct format");
            assert_eq!(gene.gene, 12u32.into());
            assert_eq!(gene.name, "TP53");
            assert_eq!(gene.terms, vec![6915u32.into(), 8283u32.into()]);
        }

        #[test]
        fn test_gene_line_invalid_array() {
            assert!(gene_line("12\tTP53\t6915").is_err());
        }

        #[test]
        fn test_reader() {
            let data = "# gene\tname\tterms\n12\tTP53\t{1}\n\n13\tMDM2\t{}\n";
            let source = TsvAnnotations::from_reader(data.as_bytes()).unwrap();
            let genes = source.genes().unwrap();
            assert_eq!(genes.len(), 2);
            assert!(genes[1].terms.is_empty());
        }
    }
}

/// Module to parse the prediction stream
pub(crate) mod predictions_tsv {
    use std::fs::File;
    use std::io::{BufRead, BufReader, Lines};
    use std::path::Path;

    use super::{column, next_record, open, parse_array};
    use crate::{ClusterId, GeneId, GoResult, GoTermId, Prediction};

    /// Parses a single line of the prediction table
    ///
    /// ```text
    /// 12  6915    7   0.001   5   0.8 40  0.25    {12,13,14}
    /// ```
    ///
    /// The member column is optional
    fn prediction_line(line: &str) -> GoResult<Prediction> {
        let mut cols = line.split('\t');
        let gene = GeneId::try_from(column(&mut cols, line)?)?;
        let term = GoTermId::try_from(column(&mut cols, line)?)?;
        let cluster = ClusterId::try_from(column(&mut cols, line)?)?;
        let p_value: f64 = column(&mut cols, line)?.trim().parse()?;
        let recurrence: f64 = column(&mut cols, line)?.trim().parse()?;
        let connectivity: f64 = column(&mut cols, line)?.trim().parse()?;
        let cluster_size: usize = column(&mut cols, line)?.trim().parse()?;
        let unknown_ratio: f64 = column(&mut cols, line)?.trim().parse()?;
        let members: Vec<GeneId> = match cols.next() {
            Some(members) if !members.trim().is_empty() => parse_array(members)?,
            _ => Vec::new(),
        };
        Ok(Prediction::new(gene, term, cluster)
            .with_p_value(p_value)
            .with_recurrence(recurrence)
            .with_connectivity(connectivity)
            .with_cluster_size(cluster_size)
            .with_unknown_ratio(unknown_ratio)
            .with_members(members))
    }

    /// A single-pass iterator of [`Prediction`] records
    ///
    /// Columns: `gene, go, cluster, p_value, recurrence, connectivity,
    /// cluster_size, unknown_ratio, {members}`
    ///
    /// # Examples
    ///
    /// ```
    /// use gopredict::parser::PredictionReader;
    ///
    /// let data = "1\t5\t7\t0.001\t5\t0.8\t3\t0.0\t{1,2,3}\n";
    /// let mut reader = PredictionReader::new(data.as_bytes());
    /// let prediction = reader.next().unwrap().unwrap();
    /// assert_eq!(prediction.members().len(), 3);
    /// assert!(reader.next().is_none());
    /// ```
    pub struct PredictionReader<R> {
        lines: Lines<R>,
    }

    impl PredictionReader<BufReader<File>> {
        /// Opens a prediction file
        ///
        /// # Errors
        ///
        /// [`crate::GoError::CannotOpenFile`]: the file is not present or can't be opened
        pub fn open<P: AsRef<Path>>(file: P) -> GoResult<Self> {
            Ok(Self::new(open(file)?))
        }
    }

    impl<R: BufRead> PredictionReader<R> {
        pub fn new(reader: R) -> Self {
            Self {
                lines: reader.lines(),
            }
        }
    }

    impl<R: BufRead> Iterator for PredictionReader<R> {
        type Item = GoResult<Prediction>;
        fn next(&mut self) -> Option<Self::Item> {
            next_record(&mut self.lines).map(|line| prediction_line(&line?))
        }
    }

}

/// Module to parse co-expression network edges
pub(crate) mod network_tsv {
    use std::io::BufRead;
    use std::path::Path;

    use super::{column, open, records};
    use crate::redundancy::CoexpressionNetwork;
    use crate::{GeneId, GoResult};

    fn edge_line(line: &str) -> GoResult<(GeneId, GeneId)> {
        let mut cols = line.split('\t');
        let a = GeneId::try_from(column(&mut cols, line)?)?;
        let b = GeneId::try_from(column(&mut cols, line)?)?;
        Ok((a, b))
    }

    /// Reads an undirected co-expression network, one `gene, gene` edge per line
    ///
    /// # Errors
    ///
    /// - [`crate::GoError::CannotOpenFile`]: the file is not present or can't be opened
    /// - [`crate::GoError::InvalidInput`]: a line has missing columns
    /// - [`crate::GoError::ParseIntError`]: a line contains an invalid gene id
    pub fn read_network<P: AsRef<Path>>(file: P) -> GoResult<CoexpressionNetwork> {
        network_from_reader(open(file)?)
    }

    /// Reads an undirected co-expression network from a reader
    ///
    /// # Errors
    ///
    /// Same as [`read_network`], without `CannotOpenFile`
    pub fn network_from_reader<R: BufRead>(reader: R) -> GoResult<CoexpressionNetwork> {
        let mut network = CoexpressionNetwork::new();
        for (a, b) in records(reader, edge_line)? {
            network.add_edge(a, b);
        }
        Ok(network)
    }

    #[cfg(test)]
    mod test_network_parsing {
        use super::*;

        #[test]
        fn test_reader() {
            let network = network_from_reader("1\t2\n2\t3\n".as_bytes()).unwrap();
            assert_eq!(network.len(), 3);
        }

        #[test]
        fn test_invalid_gene() {
            assert!(network_from_reader("1\tTP53\n".as_bytes()).is_err());
        }
    }
}

pub use annotations_tsv::TsvAnnotations;
pub use network_tsv::{network_from_reader, read_network};
pub use ontology_tsv::TsvOntology;
pub use predictions_tsv::PredictionReader;
