//! Edge List Export
//!
//! The composed network as comma-delimited text, one edge per line, with
//! the polarity of each endpoint.

use opinion_events::Polarity;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::components::{Agent, AgentId, NetworkGraph};
use crate::error::{OutputError, TopologyError};

/// Edge list file name inside the output directory
pub const EDGE_LIST_FILE_NAME: &str = "edgelist.csv";

pub const EDGE_LIST_HEADER: &str = "source,target,source_polarity,target_polarity";

/// One exported edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    pub source: AgentId,
    pub target: AgentId,
    pub source_polarity: Polarity,
    pub target_polarity: Polarity,
}

impl EdgeRecord {
    /// Returns true if the edge joins the two populations.
    pub fn is_cross_link(&self) -> bool {
        self.source_polarity != self.target_polarity
    }
}

/// Edges of `graph` with endpoint polarities taken from `population`.
pub fn edge_records(graph: &NetworkGraph, population: &[Agent]) -> Vec<EdgeRecord> {
    graph
        .edges()
        .filter_map(|(u, v)| {
            let source = population.get(u.index())?;
            let target = population.get(v.index())?;
            Some(EdgeRecord {
                source: u,
                target: v,
                source_polarity: source.polarity,
                target_polarity: target.polarity,
            })
        })
        .collect()
}

/// Writes the edge list with a header line.
pub fn write_edge_list(
    writer: &mut impl Write,
    graph: &NetworkGraph,
    population: &[Agent],
) -> Result<usize, OutputError> {
    writeln!(writer, "{}", EDGE_LIST_HEADER)?;
    let records = edge_records(graph, population);
    for record in &records {
        writeln!(
            writer,
            "{},{},{},{}",
            record.source,
            record.target,
            record.source_polarity.label(),
            record.target_polarity.label()
        )?;
    }
    Ok(records.len())
}

/// Writes the edge list to `path`, returning the number of edges written.
pub fn write_edge_list_file(
    path: impl AsRef<Path>,
    graph: &NetworkGraph,
    population: &[Agent],
) -> Result<usize, OutputError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let written = write_edge_list(&mut writer, graph, population)?;
    writer.flush()?;
    Ok(written)
}

/// Parses an edge list. The header line is optional; blank lines are skipped.
pub fn read_edge_list(reader: impl BufRead) -> Result<Vec<EdgeRecord>, OutputError> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        let line_no = index + 1;
        if line.is_empty() || (line_no == 1 && line == EDGE_LIST_HEADER) {
            continue;
        }
        records.push(parse_record(line, line_no)?);
    }
    Ok(records)
}

pub fn read_edge_list_file(path: impl AsRef<Path>) -> Result<Vec<EdgeRecord>, OutputError> {
    read_edge_list(BufReader::new(File::open(path)?))
}

fn parse_record(line: &str, line_no: usize) -> Result<EdgeRecord, OutputError> {
    let malformed = |reason: String| OutputError::MalformedEdge {
        line: line_no,
        reason,
    };
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [source, target, source_polarity, target_polarity] = fields[..] else {
        return Err(malformed(format!("expected 4 fields, found {}", fields.len())));
    };
    let node = |field: &str| {
        field
            .parse::<usize>()
            .map(AgentId)
            .map_err(|e| malformed(format!("bad node id {:?}: {}", field, e)))
    };
    let polarity = |field: &str| {
        field
            .parse::<Polarity>()
            .map_err(|e| malformed(e.to_string()))
    };

    Ok(EdgeRecord {
        source: node(source)?,
        target: node(target)?,
        source_polarity: polarity(source_polarity)?,
        target_polarity: polarity(target_polarity)?,
    })
}

/// Rebuilds a graph with `node_count` nodes from exported records.
pub fn graph_from_records(
    node_count: usize,
    records: &[EdgeRecord],
) -> Result<NetworkGraph, TopologyError> {
    let mut graph = NetworkGraph::with_nodes(node_count);
    for record in records {
        graph.add_edge(record.source, record.target)?;
    }
    Ok(graph)
}
