use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace};

const COMMENT_CHAR: char = '#';

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: DeckParseErrorKind },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckParseErrorKind {
    #[error("'{keyword}' expects three integers, found {found}")]
    WrongArity { keyword: &'static str, found: usize },
    #[error("Invalid integer for '{keyword}' (value: '{value}')")]
    InvalidInt { keyword: &'static str, value: String },
    #[error("'{keyword}' values must be positive (value: '{value}')")]
    NonPositive { keyword: &'static str, value: String },
}

/// Per-axis process counts requested by a `pdime` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessGrid {
    pub dims: [u32; 3],
}

impl Default for ProcessGrid {
    fn default() -> Self {
        Self { dims: [1, 1, 1] }
    }
}

impl ProcessGrid {
    pub fn process_count(&self) -> u64 {
        self.dims
            .iter()
            .fold(1u64, |acc, &d| acc.saturating_mul(u64::from(d)))
    }

    /// A run is parallel only when more than one process is requested; `pdime 1 1 1` is
    /// sequential.
    pub fn is_parallel(&self) -> bool {
        self.process_count() > 1
    }
}

/// Grid point counts from a `dime` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    pub dims: [u64; 3],
}

impl GridDimensions {
    pub fn cell_count(&self) -> u64 {
        self.dims.iter().fold(1u64, |acc, &n| acc.saturating_mul(n))
    }
}

/// The routing-relevant content of an input deck.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckSummary {
    pub process_grid: ProcessGrid,
    pub async_requested: bool,
    /// The last `dime` directive in the deck, if any.
    pub grid: Option<GridDimensions>,
    /// File names referenced inside the `read ... end` block, in first-reference order.
    pub auxiliary_files: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadBlock {
    NotSeen,
    Inside,
    Closed,
}

fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_CHAR) {
        Some(pos) => line[..pos].trim(),
        None => line.trim(),
    }
}

fn parse_triplet<T>(
    keyword: &'static str,
    fields: &[&str],
    line: usize,
) -> Result<[T; 3], DeckError>
where
    T: std::str::FromStr + Default + PartialOrd + Copy,
{
    if fields.len() < 3 {
        return Err(DeckError::Parse {
            line,
            kind: DeckParseErrorKind::WrongArity {
                keyword,
                found: fields.len(),
            },
        });
    }

    let mut values = [T::default(); 3];
    for (slot, raw) in values.iter_mut().zip(fields) {
        let value: T = raw.parse().map_err(|_| DeckError::Parse {
            line,
            kind: DeckParseErrorKind::InvalidInt {
                keyword,
                value: raw.to_string(),
            },
        })?;
        if value <= T::default() {
            return Err(DeckError::Parse {
                line,
                kind: DeckParseErrorKind::NonPositive {
                    keyword,
                    value: raw.to_string(),
                },
            });
        }
        *slot = value;
    }
    Ok(values)
}

impl DeckSummary {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DeckError> {
        let path = path.as_ref();
        debug!("Scanning input deck {:?}", path);
        let mut reader = BufReader::new(File::open(path)?);
        Self::scan(&mut reader)
    }

    pub fn scan(reader: &mut impl BufRead) -> Result<Self, DeckError> {
        let mut summary = DeckSummary::default();
        let mut read_block = ReadBlock::NotSeen;

        for (line_num, line_res) in reader.lines().enumerate() {
            let raw = line_res?;
            let line_num = line_num + 1;
            let trimmed = raw.trim();

            if trimmed.starts_with(COMMENT_CHAR) {
                continue;
            }
            let content = strip_comment(trimmed);
            if content.is_empty() {
                continue;
            }

            let fields: Vec<&str> = content.split_whitespace().collect();
            let keyword = fields[0].to_ascii_lowercase();

            match read_block {
                ReadBlock::NotSeen if keyword == "read" && fields.len() == 1 => {
                    read_block = ReadBlock::Inside;
                    continue;
                }
                ReadBlock::Inside => {
                    if keyword == "end" {
                        read_block = ReadBlock::Closed;
                    } else {
                        // `<keyword> <format> <file>...`; shorter lines keep their last token.
                        let names = if fields.len() > 2 {
                            &fields[2..]
                        } else {
                            &fields[fields.len() - 1..]
                        };
                        for name in names {
                            if !summary.auxiliary_files.iter().any(|f| f == name) {
                                trace!("Line {}: deck references '{}'", line_num, name);
                                summary.auxiliary_files.push(name.to_string());
                            }
                        }
                    }
                    continue;
                }
                _ => {}
            }

            match keyword.as_str() {
                "pdime" => {
                    let dims = parse_triplet::<u32>("pdime", &fields[1..], line_num)?;
                    summary.process_grid = ProcessGrid { dims };
                }
                "dime" => {
                    let dims = parse_triplet::<u64>("dime", &fields[1..], line_num)?;
                    summary.grid = Some(GridDimensions { dims });
                }
                "async" => summary.async_requested = true,
                _ => {}
            }
        }

        debug!(
            "Deck summary: {} process(es), async = {}, {} auxiliary file(s)",
            summary.process_grid.process_count(),
            summary.async_requested,
            summary.auxiliary_files.len()
        );
        Ok(summary)
    }
}
