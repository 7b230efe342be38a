use std::path::PathBuf;

use csv_core::WriteResult;

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Format {
    Csv,
    Jsonl,
    Table,
}

#[derive(clap::Parser)]
#[group(id = "output::Args")]
pub struct Args {
    /// Write to this file instead of standard output.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
    #[arg(long, short = 'f', value_enum, default_value_t = Format::Csv)]
    format: Format,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("could not open the output file at {1:?}")]
    OpenOutputFile(#[source] std::io::Error, PathBuf),
    #[error("could not write records to the output file at {1:?}")]
    WriteFile(#[source] std::io::Error, PathBuf),
    #[error("could not write records to the terminal")]
    WriteStdout(#[source] std::io::Error),
    #[error("could not serialize a record to JSON")]
    SerializeJson(#[source] serde_json::Error),
}

impl Args {
    pub fn to_output(self) -> Result<Output, Error> {
        let io = match &self.output {
            None => Box::new(std::io::stdout().lock()) as Box<dyn std::io::Write>,
            Some(path) => Box::new(
                std::fs::OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)
                    .map_err(|e| Error::OpenOutputFile(e, path.clone()))?,
            ) as Box<_>,
        };
        Ok(Output::new(self.format, self.output, io))
    }
}

pub struct Output {
    destination: Option<PathBuf>,
    io: Box<dyn std::io::Write>,
    formatter: Formatter,
    records: usize,
}

enum Formatter {
    Csv,
    Jsonl,
    Table { comfy: comfy_table::Table },
}

impl Output {
    pub fn new(format: Format, destination: Option<PathBuf>, io: Box<dyn std::io::Write>) -> Self {
        let formatter = match format {
            Format::Csv => Formatter::Csv,
            Format::Jsonl => Formatter::Jsonl,
            Format::Table => {
                let mut comfy = comfy_table::Table::new();
                comfy.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
                Formatter::Table { comfy }
            }
        };
        Self {
            destination,
            io,
            formatter,
            records: 0,
        }
    }

    /// Header row: the very first CSV row, the column titles of a table,
    /// nothing for JSONL (field names repeat in every record there). Must be
    /// called before any record.
    pub fn headers(&mut self, headers: &[&'static str]) -> Result<(), Error> {
        assert_eq!(self.records, 0, "headers must be written before records");
        match &mut self.formatter {
            Formatter::Csv => self.write_csv_row(headers),
            Formatter::Table { comfy } => {
                comfy.set_header(headers.to_vec());
                Ok(())
            }
            Formatter::Jsonl => Ok(()),
        }
    }

    pub fn record<R: serde::Serialize>(
        &mut self,
        row: impl FnOnce() -> Vec<String>,
        serde_record: impl FnOnce() -> R,
    ) -> Result<(), Error> {
        match &mut self.formatter {
            Formatter::Csv => {
                let values = row();
                self.write_csv_row(&values)?;
            }
            Formatter::Table { comfy } => {
                comfy.add_row(row());
            }
            Formatter::Jsonl => {
                serde_json::to_writer(&mut self.io, &serde_record())
                    .map_err(Error::SerializeJson)?;
                writeln!(self.io).map_err(|e| self.write_error(e))?;
            }
        }
        self.records += 1;
        Ok(())
    }

    /// Records written so far, headers excluded.
    pub fn records(&self) -> usize {
        self.records
    }

    fn write_csv_row<V: std::ops::Deref<Target = str>>(&mut self, values: &[V]) -> Result<(), Error> {
        // Worst case every byte escapes into two, plus the enclosing quotes.
        let max_len = 2 + 2 * values.iter().map(|v| v.len()).max().unwrap_or(0);
        let mut scratch = vec![0; max_len];
        let mut writer = csv_core::Writer::new();
        for (position, value) in values.iter().enumerate() {
            if position > 0 {
                let (WriteResult::InputEmpty, written) = writer.delimiter(&mut scratch) else {
                    panic!("csv delimiter does not fit the scratch buffer");
                };
                self.io
                    .write_all(&scratch[..written])
                    .map_err(|e| self.write_error(e))?;
            }
            let input = value.as_bytes();
            let (WriteResult::InputEmpty, read, written) = writer.field(input, &mut scratch) else {
                panic!("csv field does not fit the scratch buffer");
            };
            assert_eq!(input.len(), read);
            self.io
                .write_all(&scratch[..written])
                .map_err(|e| self.write_error(e))?;
        }
        let (WriteResult::InputEmpty, written) = writer.terminator(&mut scratch) else {
            panic!("csv terminator does not fit the scratch buffer");
        };
        self.io
            .write_all(&scratch[..written])
            .map_err(|e| self.write_error(e))
    }

    fn write_error(&self, e: std::io::Error) -> Error {
        match &self.destination {
            None => Error::WriteStdout(e),
            Some(p) => Error::WriteFile(e, p.clone()),
        }
    }

    pub fn commit(mut self) -> Result<(), Error> {
        if let Formatter::Table { comfy } = &self.formatter {
            writeln!(self.io, "{comfy}").map_err(|e| self.write_error(e))?;
        }
        self.io.flush().map_err(|e| self.write_error(e))
    }
}
