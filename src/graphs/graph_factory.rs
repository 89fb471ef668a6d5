use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter},
    path::Path,
    str::{FromStr, SplitWhitespace},
};

use ahash::{HashMap, HashMapExt};
use indicatif::ProgressIterator;
use itertools::Itertools;
use tracing::info;

use super::{
    road_graph::{Coordinate, RoadGraph},
    vec_vec_graph::VecVecGraph,
    Distance, Graph, Vertex, WeightedEdge,
};
use crate::error::GraphError;

pub struct GraphFactory {}

impl GraphFactory {
    /// Reads a graph, choosing the format by file extension.
    pub fn from_file(path: &Path) -> Result<RoadGraph, GraphError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default();
        match extension {
            "fmi" => Self::from_fmi_file(path),
            "gr" => Self::from_gr_file(path),
            "bincode" => Self::from_bincode_file(path),
            other => Err(GraphError::UnsupportedExtension(other.to_string())),
        }
    }

    pub fn from_fmi_file(path: &Path) -> Result<RoadGraph, GraphError> {
        let reader = BufReader::new(File::open(path)?);
        let graph = Self::from_fmi_reader(reader)?;
        info!(
            path = %path.display(),
            vertices = graph.number_of_vertices(),
            edges = graph.number_of_edges(),
            "read fmi graph"
        );
        Ok(graph)
    }

    /// Parses the fmi format: optional `#` comment lines, the number of
    /// vertices, the number of edges, one line per vertex
    /// (`id id2 latitude longitude elevation`) and one line per directed
    /// edge (`tail head weight type maxspeed`).
    pub fn from_fmi_reader<R: BufRead>(reader: R) -> Result<RoadGraph, GraphError> {
        let mut lines = numbered_lines(reader);

        let (line, header) = next_content_line(&mut lines, "number of vertices")?;
        let number_of_vertices: usize =
            parse_field(&mut header.split_whitespace(), line, "number of vertices")?;
        let (line, header) = next_content_line(&mut lines, "number of edges")?;
        let number_of_edges: usize =
            parse_field(&mut header.split_whitespace(), line, "number of edges")?;

        let mut coordinates = Vec::with_capacity(number_of_vertices);
        for _ in (0..number_of_vertices).progress_count(number_of_vertices as u64) {
            let (line, vertex_line) = next_content_line(&mut lines, "vertices")?;
            let mut values = vertex_line.split_whitespace();
            let _: u64 = parse_field(&mut values, line, "vertex id")?;
            let _: u64 = parse_field(&mut values, line, "second vertex id")?;
            let latitude = parse_field(&mut values, line, "latitude")?;
            let longitude = parse_field(&mut values, line, "longitude")?;
            coordinates.push(Coordinate::new(latitude, longitude));
        }

        let mut directed_edges = Vec::with_capacity(number_of_edges);
        for _ in (0..number_of_edges).progress_count(number_of_edges as u64) {
            let (line, edge_line) = next_content_line(&mut lines, "edges")?;
            let mut values = edge_line.split_whitespace();
            let tail = parse_vertex(&mut values, line, "tail", number_of_vertices)?;
            let head = parse_vertex(&mut values, line, "head", number_of_vertices)?;
            let weight = parse_weight(&mut values, line)?;
            directed_edges.push((tail, head, weight));
        }

        let edges = pair_directed_edges(&directed_edges);
        Ok(RoadGraph::from_edges(&edges, coordinates))
    }

    pub fn from_gr_file(path: &Path) -> Result<RoadGraph, GraphError> {
        let reader = BufReader::new(File::open(path)?);
        let graph = Self::from_gr_reader(reader)?;
        info!(
            path = %path.display(),
            vertices = graph.number_of_vertices(),
            edges = graph.number_of_edges(),
            "read gr graph"
        );
        Ok(graph)
    }

    /// Parses the DIMACS shortest path format. Vertex ids in the file start
    /// at one.
    pub fn from_gr_reader<R: BufRead>(reader: R) -> Result<RoadGraph, GraphError> {
        let mut number_of_vertices = None;
        let mut directed_edges = Vec::new();

        for numbered_line in numbered_lines(reader) {
            let (line, content) = numbered_line?;
            let mut values = content.split_whitespace();
            match values.next() {
                Some("p") => {
                    let _: String = parse_field(&mut values, line, "problem type")?;
                    number_of_vertices = Some(parse_field::<usize>(
                        &mut values,
                        line,
                        "number of vertices",
                    )?);
                }
                Some("a") => {
                    let number_of_vertices =
                        number_of_vertices.ok_or_else(|| GraphError::Malformed {
                            line,
                            message: "arc before problem line".to_string(),
                        })?;
                    let tail: Vertex = parse_field(&mut values, line, "tail")?;
                    let head: Vertex = parse_field(&mut values, line, "head")?;
                    if tail == 0
                        || head == 0
                        || tail as usize > number_of_vertices
                        || head as usize > number_of_vertices
                    {
                        return Err(GraphError::Malformed {
                            line,
                            message: format!("arc {} -> {} out of range", tail, head),
                        });
                    }
                    let weight = parse_weight(&mut values, line)?;
                    directed_edges.push((tail - 1, head - 1, weight));
                }
                _ => {}
            }
        }

        let number_of_vertices =
            number_of_vertices.ok_or(GraphError::UnexpectedEnd("problem line"))?;
        let edges = pair_directed_edges(&directed_edges);
        let mut graph = VecVecGraph::new(number_of_vertices as u32);
        edges.iter().for_each(|edge| graph.add_edge(edge));

        Ok(RoadGraph::new(graph, Vec::new()))
    }

    pub fn from_bincode_file(path: &Path) -> Result<RoadGraph, GraphError> {
        let reader = BufReader::new(File::open(path)?);
        let graph: RoadGraph = bincode::deserialize_from(reader)?;
        Ok(graph)
    }

    pub fn to_bincode_file(graph: &RoadGraph, path: &Path) -> Result<(), GraphError> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, graph)?;
        Ok(())
    }
}

/// Turns directed edges into road segments: a pair of opposite edges with the
/// same weight becomes one bidirectional segment, every other edge is one-way.
/// Self loops are dropped and parallel edges keep their minimum weight.
pub fn pair_directed_edges(directed_edges: &[(Vertex, Vertex, Distance)]) -> Vec<WeightedEdge> {
    let mut weights: HashMap<(Vertex, Vertex), Distance> = HashMap::new();
    for &(tail, head, weight) in directed_edges {
        if tail == head {
            continue;
        }
        let entry = weights.entry((tail, head)).or_insert(weight);
        if weight < *entry {
            *entry = weight;
        }
    }

    weights
        .iter()
        .filter_map(|(&(tail, head), &weight)| match weights.get(&(head, tail)) {
            Some(&reverse_weight) if reverse_weight == weight => {
                (tail < head).then(|| WeightedEdge::bidirectional(tail, head, weight))
            }
            _ => Some(WeightedEdge::one_way(tail, head, weight)),
        })
        .sorted_by_key(|edge| (edge.tail, edge.head))
        .collect()
}

fn numbered_lines<R: BufRead>(reader: R) -> impl Iterator<Item = io::Result<(usize, String)>> {
    reader
        .lines()
        .enumerate()
        .map(|(index, line)| line.map(|line| (index + 1, line)))
}

// skips blank and comment lines
fn next_content_line<I>(lines: &mut I, section: &'static str) -> Result<(usize, String), GraphError>
where
    I: Iterator<Item = io::Result<(usize, String)>>,
{
    for numbered_line in lines.by_ref() {
        let (line, content) = numbered_line?;
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        return Ok((line, content));
    }

    Err(GraphError::UnexpectedEnd(section))
}

fn parse_field<T: FromStr>(
    values: &mut SplitWhitespace<'_>,
    line: usize,
    field: &str,
) -> Result<T, GraphError> {
    let value = values.next().ok_or_else(|| GraphError::Malformed {
        line,
        message: format!("no {} found", field),
    })?;
    value.parse().map_err(|_| GraphError::Malformed {
        line,
        message: format!("unable to parse {} {:?}", field, value),
    })
}

fn parse_vertex(
    values: &mut SplitWhitespace<'_>,
    line: usize,
    field: &str,
    number_of_vertices: usize,
) -> Result<Vertex, GraphError> {
    let vertex: Vertex = parse_field(values, line, field)?;
    if vertex as usize >= number_of_vertices {
        return Err(GraphError::Malformed {
            line,
            message: format!("{} {} out of range", field, vertex),
        });
    }
    Ok(vertex)
}

fn parse_weight(values: &mut SplitWhitespace<'_>, line: usize) -> Result<Distance, GraphError> {
    let weight: Distance = parse_field(values, line, "weight")?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(GraphError::Malformed {
            line,
            message: format!("weight {} is not a non-negative number", weight),
        });
    }
    Ok(weight)
}
