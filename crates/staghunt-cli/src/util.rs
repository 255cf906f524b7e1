use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use staghunt_engine::bots::Roster;
use staghunt_training::search::{GenerationObserver, GenerationStats};

use crate::schema::trained_model::TrainedModel;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::create(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn create(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }

    /// Writes `value` as a single line of compact JSON.
    pub fn write_json_line<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer(&mut *self, value)
            .with_context(|| format!("Failed to write JSON line to {}", self.display_path()))?;
        writeln!(&mut *self)
            .with_context(|| format!("Failed to write newline to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Appends every generation's statistics to an [`Output`] as JSON Lines.
///
/// Observers cannot fail, so the first write error is kept and reported by
/// [`StatsWriter::finish`]; later generations are skipped.
#[derive(Debug)]
pub struct StatsWriter {
    output: Output,
    error: Option<anyhow::Error>,
}

impl StatsWriter {
    pub fn create(path: PathBuf) -> anyhow::Result<Self> {
        Ok(Self {
            output: Output::create(path)?,
            error: None,
        })
    }

    pub fn finish(mut self) -> anyhow::Result<()> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let path = self.output.display_path();
        self.output
            .flush()
            .with_context(|| format!("Failed to flush output to {path}"))
    }
}

impl GenerationObserver for StatsWriter {
    fn on_generation(&mut self, stats: &GenerationStats) {
        if self.error.is_none()
            && let Err(e) = self.output.write_json_line(stats)
        {
            tracing::warn!(error = %e, "stopped writing generation statistics");
            self.error = Some(e);
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

pub fn read_model_file<P>(path: P) -> anyhow::Result<TrainedModel>
where
    P: AsRef<Path>,
{
    read_json_file("model", path)
}

/// Reads a roster file: a JSON list of bot specifications.
pub fn read_roster_file<P>(path: P) -> anyhow::Result<Roster>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let roster: Roster = read_json_file("roster", path)?;
    anyhow::ensure!(!roster.is_empty(), "Roster file {} lists no bots", path.display());
    roster
        .validate()
        .with_context(|| format!("Invalid roster file: {}", path.display()))?;
    Ok(roster)
}
