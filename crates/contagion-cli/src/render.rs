//! Terminal rendering of engine snapshots

use std::io::{self, BufRead, Write};

use contagion_core::{CascadeState, ContagionResult, EpidemicState, NodeState};
use contagion_diffusion::{Snapshot, SnapshotSink};
use crossterm::style::{Color, Stylize};

/// Legend of a state type: colour and caption per display category
pub trait Legend: NodeState {
    /// Categories in display order
    const ENTRIES: &'static [(&'static str, Color)];

    /// Category index of a node
    fn entry(self, vaccinated: bool) -> usize;
}

impl Legend for CascadeState {
    const ENTRIES: &'static [(&'static str, Color)] =
        &[("Active", Color::Red), ("Inactive", Color::Blue)];

    fn entry(self, _vaccinated: bool) -> usize {
        match self {
            CascadeState::Active => 0,
            CascadeState::Inactive => 1,
        }
    }
}

impl Legend for EpidemicState {
    const ENTRIES: &'static [(&'static str, Color)] = &[
        ("Susceptible", Color::DarkGrey),
        ("Infected", Color::Red),
        ("Recovered", Color::Green),
        ("Sheltered", Color::Magenta),
        ("Vaccinated", Color::Blue),
    ];

    fn entry(self, vaccinated: bool) -> usize {
        match self {
            EpidemicState::Sheltered => 3,
            EpidemicState::Recovered => 2,
            EpidemicState::Infected => 1,
            EpidemicState::Susceptible if vaccinated => 4,
            EpidemicState::Susceptible => 0,
        }
    }
}

/// Writes each snapshot as a coloured node listing; optionally waits for
/// Enter between frames.
pub struct TerminalSink<W, R> {
    out: W,
    input: Option<R>,
}

impl TerminalSink<io::Stdout, io::StdinLock<'static>> {
    /// Render to stdout, pausing on stdin when `interactive`
    pub fn stdout(interactive: bool) -> Self {
        Self::new(io::stdout(), interactive.then(|| io::stdin().lock()))
    }
}

impl<W: Write, R: BufRead> TerminalSink<W, R> {
    pub fn new(out: W, input: Option<R>) -> Self {
        Self { out, input }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn pause(&mut self) -> io::Result<()> {
        if let Some(input) = self.input.as_mut() {
            write!(self.out, "Press Enter to continue...")?;
            self.out.flush()?;
            let mut line = String::new();
            input.read_line(&mut line)?;
        }
        Ok(())
    }
}

impl<S: Legend, W: Write, R: BufRead> SnapshotSink<S> for TerminalSink<W, R> {
    fn on_snapshot(&mut self, snapshot: &Snapshot<'_, S>) -> ContagionResult<()> {
        let mut groups: Vec<Vec<&str>> = vec![Vec::new(); S::ENTRIES.len()];
        for (i, (label, state)) in snapshot.labels().iter().zip(snapshot.states).enumerate() {
            groups[state.entry(snapshot.is_vaccinated(i))].push(label.as_str());
        }

        writeln!(self.out, "{}", format!("== {} ==", snapshot.title).bold())?;
        for ((caption, color), nodes) in S::ENTRIES.iter().zip(&groups) {
            if nodes.is_empty() {
                continue;
            }
            let listing = nodes
                .iter()
                .map(|n| n.with(*color).to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(self.out, "{} ({}): {}", caption.with(*color), nodes.len(), listing)?;
        }
        writeln!(self.out)?;
        self.out.flush()?;

        self.pause()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contagion_graph::Graph;
    use std::collections::BTreeSet;

    #[test]
    fn test_renders_groups() {
        let graph = Graph::from_edges(false, [("a", "b"), ("b", "c"), ("c", "d")]);
        let adj = graph.directed();
        let states = [
            EpidemicState::Infected,
            EpidemicState::Susceptible,
            EpidemicState::Susceptible,
            EpidemicState::Sheltered,
        ];
        let vaccinated: BTreeSet<usize> = [2].into_iter().collect();

        let mut sink = TerminalSink::new(Vec::new(), None::<io::Empty>);
        sink.on_snapshot(&Snapshot {
            title: "Day 2: 1 new infections.",
            graph: &adj,
            states: &states,
            vaccinated: Some(&vaccinated),
        })
        .unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.contains("== Day 2: 1 new infections. =="));
        assert!(text.contains("Infected"));
        assert!(text.contains("(1)"));
        assert!(text.contains("Vaccinated"));
        assert!(!text.contains("Recovered"));
    }

    #[test]
    fn test_pauses_on_input() {
        let graph = Graph::from_edges(false, [("a", "b")]);
        let adj = graph.undirected();
        let states = [CascadeState::Active, CascadeState::Inactive];

        let mut sink = TerminalSink::new(Vec::new(), Some(&b"\n"[..]));
        sink.on_snapshot(&Snapshot {
            title: "Round 1",
            graph: &adj,
            states: &states,
            vaccinated: None,
        })
        .unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.ends_with("Press Enter to continue..."));
    }

    #[test]
    fn test_legend_entries() {
        assert_eq!(EpidemicState::Susceptible.entry(true), 4);
        assert_eq!(EpidemicState::Infected.entry(true), 1);
        assert_eq!(CascadeState::Inactive.entry(false), 1);
    }
}
