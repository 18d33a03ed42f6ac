use crate::core::models::atoms::{Atom, AtomList};
use std::io::{self, BufRead};
use thiserror::Error;

/// Whitespace-separated fields of an ATOM/HETATM record without a chain identifier:
/// record, serial, atom name, residue name, residue number, x, y, z, charge, radius.
const FIELDS_WITHOUT_CHAIN: usize = 10;

#[derive(Debug, Error)]
pub enum PqrError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PqrParseErrorKind },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PqrParseErrorKind {
    #[error("Record has {found} fields, expected at least {FIELDS_WITHOUT_CHAIN}")]
    TooFewFields { found: usize },
    #[error("Invalid float for {field} (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
}

fn is_atom_record(line: &str) -> bool {
    line.starts_with("ATOM") || line.starts_with("HETATM")
}

/// Reads the atoms of a PQR molecule description.
///
/// Only ATOM and HETATM records contribute; every other line is ignored. An optional chain
/// identifier column is detected from the field count.
pub fn read_atoms(reader: &mut impl BufRead) -> Result<AtomList, PqrError> {
    let mut atoms = AtomList::new();

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;
        if !is_atom_record(&line) {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < FIELDS_WITHOUT_CHAIN {
            return Err(PqrError::Parse {
                line: line_num,
                kind: PqrParseErrorKind::TooFewFields {
                    found: fields.len(),
                },
            });
        }
        let offset = usize::from(fields.len() > FIELDS_WITHOUT_CHAIN);

        let parse = |index: usize, field: &'static str| -> Result<f64, PqrError> {
            let raw = fields[index + offset];
            raw.parse().map_err(|_| PqrError::Parse {
                line: line_num,
                kind: PqrParseErrorKind::InvalidFloat {
                    field,
                    value: raw.to_string(),
                },
            })
        };

        atoms.push(Atom {
            position: [parse(5, "x")?, parse(6, "y")?, parse(7, "z")?],
            charge: parse(8, "charge")?,
            radius: parse(9, "radius")?,
        });
    }

    Ok(atoms)
}

/// Convenience wrapper over [`read_atoms`] for an in-memory molecule description.
pub fn read_atoms_from_str(molecule: &str) -> Result<AtomList, PqrError> {
    read_atoms(&mut io::Cursor::new(molecule))
}
