use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;

use crate::{graphs::Graph, search::path::ShortestPathRequest};

pub fn get_progressbar(job_name: &str, len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_message(job_name.to_string());
    if let Ok(style) =
        ProgressStyle::with_template(" {msg} {wide_bar} {human_pos}/{human_len} eta: {eta_precise}")
    {
        bar.set_style(style);
    }
    bar
}

pub fn get_progressspinner(job_name: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(job_name.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Draws `number_of_requests` uniformly random source target pairs.
pub fn random_requests<R: Rng>(
    graph: &dyn Graph,
    number_of_requests: u32,
    rng: &mut R,
) -> Vec<ShortestPathRequest> {
    let number_of_vertices = graph.number_of_vertices();
    if number_of_vertices == 0 {
        return Vec::new();
    }

    (0..number_of_requests)
        .map(|_| ShortestPathRequest {
            source: rng.gen_range(0..number_of_vertices),
            target: rng.gen_range(0..number_of_vertices),
        })
        .collect()
}
