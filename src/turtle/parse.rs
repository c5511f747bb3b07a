//! The line-oriented turtle language.
//!
//! ```text
//! FORWARD 10
//! ROTATE 90
//! ROTATE 0,45,0
//! ARC 20 true
//! PENUP
//! PENDOWN
//! SETCOLOR #ff8800
//! ```

use super::{Command, Turn};
use crate::drawing::Color;
use crate::math::Rotation;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: unknown command `{keyword}`")]
    UnknownCommand { line: usize, keyword: String },
    #[error("line {line}: {keyword} expects {expected}, got {found} argument(s)")]
    WrongArity {
        line: usize,
        keyword: String,
        expected: &'static str,
        found: usize,
    },
    #[error("line {line}: `{token}` is not a number")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: `{token}` is not a color")]
    InvalidColor { line: usize, token: String },
    #[error("line {line}: `{token}` is not a boolean (expected true, false, 1 or 0)")]
    InvalidFlag { line: usize, token: String },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnknownCommand { line, .. }
            | ParseError::WrongArity { line, .. }
            | ParseError::InvalidNumber { line, .. }
            | ParseError::InvalidColor { line, .. }
            | ParseError::InvalidFlag { line, .. } => *line,
        }
    }
}

/// Parses a whole program. The first malformed line aborts parsing.
pub fn parse_program(source: &str) -> Result<Vec<Command>, ParseError> {
    let mut commands = Vec::new();
    for (index, text) in source.lines().enumerate() {
        if let Some(command) = parse_line(text, index + 1)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

/// Parses one line; blank and `#` comment lines yield `None`.
pub fn parse_line(text: &str, line: usize) -> Result<Option<Command>, ParseError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = text.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = tokens.collect();

    let arity = |expected: &'static str| ParseError::WrongArity {
        line,
        keyword: keyword.to_string(),
        expected,
        found: args.len(),
    };

    let command = match keyword {
        "FORWARD" => match args.as_slice() {
            [length] => Command::Forward(number(length, line)?),
            _ => return Err(arity("1 argument")),
        },
        "ROTATE" => match args.as_slice() {
            [angles] => Command::Rotate(turn(angles, line)?),
            _ => return Err(arity("1 argument")),
        },
        "ARC" => match args.as_slice() {
            [length] => Command::Arc {
                length: number(length, line)?,
                clockwise: false,
            },
            [length, clockwise] => Command::Arc {
                length: number(length, line)?,
                clockwise: flag(clockwise, line)?,
            },
            _ => return Err(arity("1 or 2 arguments")),
        },
        "PENUP" | "PENDOWN" => {
            if !args.is_empty() {
                return Err(arity("no arguments"));
            }
            if keyword == "PENUP" {
                Command::PenUp
            } else {
                Command::PenDown
            }
        }
        "SETCOLOR" => match args.as_slice() {
            [token] => {
                let color: Color = token.parse().map_err(|_| ParseError::InvalidColor {
                    line,
                    token: token.to_string(),
                })?;
                Command::SetColor(color)
            }
            _ => return Err(arity("1 argument")),
        },
        _ => {
            return Err(ParseError::UnknownCommand {
                line,
                keyword: keyword.to_string(),
            });
        }
    };

    Ok(Some(command))
}

fn number(token: &str, line: usize) -> Result<f32, ParseError> {
    token
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            line,
            token: token.to_string(),
        })
}

fn flag(token: &str, line: usize) -> Result<bool, ParseError> {
    match token {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ParseError::InvalidFlag {
            line,
            token: token.to_string(),
        }),
    }
}

/// `deg` is a planar turn, `pitch,yaw[,roll]` an Euler delta. Degrees in, radians out.
fn turn(token: &str, line: usize) -> Result<Turn, ParseError> {
    let degrees = token
        .split(',')
        .map(|part| number(part, line))
        .collect::<Result<Vec<f32>, _>>()?;

    match degrees.as_slice() {
        [angle] => Ok(Turn::Planar(angle.to_radians())),
        [pitch, yaw] => Ok(Turn::Euler(Rotation::from_pitch_yaw_roll(
            pitch.to_radians(),
            yaw.to_radians(),
            0.0,
        ))),
        [pitch, yaw, roll] => Ok(Turn::Euler(Rotation::from_pitch_yaw_roll(
            pitch.to_radians(),
            yaw.to_radians(),
            roll.to_radians(),
        ))),
        _ => Err(ParseError::WrongArity {
            line,
            keyword: "ROTATE".to_string(),
            expected: "1 to 3 comma-separated angles",
            found: degrees.len(),
        }),
    }
}
