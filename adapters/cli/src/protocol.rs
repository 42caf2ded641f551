//! Line protocol spoken with the referee over stdin and stdout.
//!
//! Startup input is a `width height` line followed by `height` rows of maze
//! markers. Every turn then carries a score line, a unit count with one line
//! per unit, and a pellet count with one line per pellet. The reply is a
//! single line of `MOVE` orders separated by `|`.

use std::{io::BufRead, str::SplitWhitespace};

use pellet_rush_core::{
    CellCoord, Command, MoveOrder, PelletValue, Scores, Side, UnitAttributes, UnitId,
};
use thiserror::Error;

/// Separator placed between orders on the output line.
pub(crate) const ORDER_SEPARATOR: &str = "|";

/// Errors raised while decoding referee input.
#[derive(Debug, Error)]
pub(crate) enum ProtocolError {
    /// Reading from the input stream failed.
    #[error("failed to read referee input")]
    Io(#[from] std::io::Error),
    /// The stream ended in the middle of a block.
    #[error("input ended while expecting {expected}")]
    UnexpectedEof {
        /// Description of the missing line.
        expected: &'static str,
    },
    /// A line held fewer fields than required.
    #[error("line {line}: missing {field}")]
    MissingField {
        /// One-based line number.
        line: usize,
        /// Name of the missing field.
        field: &'static str,
    },
    /// A numeric field did not parse.
    #[error("line {line}: {field} must be a non-negative integer, got {value:?}")]
    InvalidNumber {
        /// One-based line number.
        line: usize,
        /// Name of the offending field.
        field: &'static str,
        /// Raw text of the field.
        value: String,
    },
    /// The ownership flag was neither `0` nor `1`.
    #[error("line {line}: ownership flag must be 0 or 1, got {value:?}")]
    InvalidOwnership {
        /// One-based line number.
        line: usize,
        /// Raw text of the flag.
        value: String,
    },
}

/// Maze description sent once before the first turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MazeHeader {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rows: Vec<String>,
}

impl MazeHeader {
    pub(crate) fn into_command(self) -> Command {
        Command::ConfigureMaze {
            width: self.width,
            height: self.height,
            rows: self.rows,
        }
    }
}

/// Unit line of a turn block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct UnitReport {
    pub(crate) id: UnitId,
    pub(crate) side: Side,
    pub(crate) cell: CellCoord,
    pub(crate) attributes: UnitAttributes,
}

/// Pellet line of a turn block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PelletReport {
    pub(crate) cell: CellCoord,
    pub(crate) value: PelletValue,
}

/// Everything the referee reports for one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TurnInput {
    pub(crate) scores: Scores,
    pub(crate) units: Vec<UnitReport>,
    pub(crate) pellets: Vec<PelletReport>,
}

impl TurnInput {
    /// Commands that replay this turn's observations into the world, starting
    /// with the turn boundary.
    pub(crate) fn into_commands(self) -> Vec<Command> {
        let mut commands = Vec::with_capacity(1 + self.units.len() + self.pellets.len());
        commands.push(Command::BeginTurn {
            scores: self.scores,
        });
        commands.extend(self.units.into_iter().map(|unit| Command::ReportUnit {
            id: unit.id,
            side: unit.side,
            cell: unit.cell,
            attributes: unit.attributes,
        }));
        commands.extend(
            self.pellets
                .into_iter()
                .map(|pellet| Command::ReportPellet {
                    cell: pellet.cell,
                    value: pellet.value,
                }),
        );
        commands
    }
}

/// Reads referee input line by line, tracking line numbers for diagnostics.
#[derive(Debug)]
pub(crate) struct LineReader<R> {
    input: R,
    line: usize,
    buffer: String,
}

impl<R: BufRead> LineReader<R> {
    pub(crate) fn new(input: R) -> Self {
        Self {
            input,
            line: 0,
            buffer: String::new(),
        }
    }

    /// Reads the maze dimensions and rows.
    pub(crate) fn read_maze_header(&mut self) -> Result<MazeHeader, ProtocolError> {
        let mut fields = self.expect_line("maze dimensions")?;
        let width = fields.next_u32("width")?;
        let height = fields.next_u32("height")?;

        let mut rows = Vec::with_capacity(height as usize);
        for _ in 0..height {
            if !self.advance()? {
                return Err(ProtocolError::UnexpectedEof {
                    expected: "maze row",
                });
            }
            rows.push(self.buffer.trim_end_matches(['\r', '\n']).to_owned());
        }

        Ok(MazeHeader {
            width,
            height,
            rows,
        })
    }

    /// Reads one turn block, or `None` when the input ended cleanly between
    /// turns.
    pub(crate) fn read_turn(&mut self) -> Result<Option<TurnInput>, ProtocolError> {
        if !self.advance()? {
            return Ok(None);
        }
        let mut fields = self.fields();
        let scores = Scores {
            mine: fields.next_u32("my score")?,
            opponent: fields.next_u32("opponent score")?,
        };

        let unit_count = self.expect_line("unit count")?.next_u32("unit count")?;
        let mut units = Vec::with_capacity(unit_count as usize);
        for _ in 0..unit_count {
            let mut fields = self.expect_line("unit line")?;
            let id = UnitId::new(fields.next_u32("unit id")?);
            let side = fields.next_side()?;
            let cell = fields.next_cell()?;
            let kind = fields.next_str("unit type")?.to_owned();
            let speed_turns_left = fields.next_u32("speed turns left")?;
            let ability_cooldown = fields.next_u32("ability cooldown")?;
            units.push(UnitReport {
                id,
                side,
                cell,
                attributes: UnitAttributes {
                    kind,
                    speed_turns_left,
                    ability_cooldown,
                },
            });
        }

        let pellet_count = self.expect_line("pellet count")?.next_u32("pellet count")?;
        let mut pellets = Vec::with_capacity(pellet_count as usize);
        for _ in 0..pellet_count {
            let mut fields = self.expect_line("pellet line")?;
            let cell = fields.next_cell()?;
            let value = PelletValue::new(fields.next_u32("pellet value")?);
            pellets.push(PelletReport { cell, value });
        }

        Ok(Some(TurnInput {
            scores,
            units,
            pellets,
        }))
    }

    fn advance(&mut self) -> Result<bool, ProtocolError> {
        self.buffer.clear();
        let read = self.input.read_line(&mut self.buffer)?;
        if read == 0 {
            return Ok(false);
        }
        self.line += 1;
        Ok(true)
    }

    fn expect_line(&mut self, expected: &'static str) -> Result<Fields<'_>, ProtocolError> {
        if !self.advance()? {
            return Err(ProtocolError::UnexpectedEof { expected });
        }
        Ok(self.fields())
    }

    fn fields(&self) -> Fields<'_> {
        Fields {
            parts: self.buffer.split_whitespace(),
            line: self.line,
        }
    }
}

struct Fields<'a> {
    parts: SplitWhitespace<'a>,
    line: usize,
}

impl<'a> Fields<'a> {
    fn next_str(&mut self, field: &'static str) -> Result<&'a str, ProtocolError> {
        self.parts.next().ok_or(ProtocolError::MissingField {
            line: self.line,
            field,
        })
    }

    fn next_u32(&mut self, field: &'static str) -> Result<u32, ProtocolError> {
        let raw = self.next_str(field)?;
        raw.parse::<u32>().map_err(|_| ProtocolError::InvalidNumber {
            line: self.line,
            field,
            value: raw.to_owned(),
        })
    }

    fn next_cell(&mut self) -> Result<CellCoord, ProtocolError> {
        let column = self.next_u32("x")?;
        let row = self.next_u32("y")?;
        Ok(CellCoord::new(column, row))
    }

    fn next_side(&mut self) -> Result<Side, ProtocolError> {
        match self.next_str("ownership flag")? {
            "1" => Ok(Side::from_flag(true)),
            "0" => Ok(Side::from_flag(false)),
            other => Err(ProtocolError::InvalidOwnership {
                line: self.line,
                value: other.to_owned(),
            }),
        }
    }
}

/// Renders the reply line for a turn.
pub(crate) fn format_orders(orders: &[MoveOrder]) -> String {
    orders
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(ORDER_SEPARATOR)
}
