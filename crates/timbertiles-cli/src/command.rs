use std::str::FromStr;

use timbertiles_core::Position;
use timbertiles_game::{InvalidPowerupType, PowerupAction, PowerupKind, Remedy};

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Place { slot: usize, row: i32, col: i32 },
    Preview { slot: usize, row: i32, col: i32 },
    Undo,
    Redo,
    Remove(Remedy),
    Buy(PowerupKind),
    Use(PowerupAction),
    GiveUp,
    Restart,
    Show,
    Stats,
    Puzzles,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub(crate) enum CommandError {
    #[display("empty command")]
    Empty,
    #[display("unknown command {name:?}; type `help` for a list")]
    Unknown { name: String },
    #[display("usage: {usage}")]
    Usage { usage: &'static str },
    #[display("invalid number {text:?}")]
    InvalidNumber { text: String },
    #[display("{_0}")]
    Powerup(InvalidPowerupType),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;
        let args: Vec<&str> = words.collect();

        let command = match (name, args.as_slice()) {
            ("place" | "p", [slot, row, col]) => Self::Place {
                slot: number(slot)?,
                row: number(row)?,
                col: number(col)?,
            },
            ("place" | "p", _) => return Err(usage("place <slot> <row> <col>")),
            ("preview", [slot, row, col]) => Self::Preview {
                slot: number(slot)?,
                row: number(row)?,
                col: number(col)?,
            },
            ("preview", _) => return Err(usage("preview <slot> <row> <col>")),
            ("remove", ["row", index]) => Self::Remove(Remedy::Row(number(index)?)),
            ("remove", ["col" | "column", index]) => Self::Remove(Remedy::Column(number(index)?)),
            ("remove", ["cell", row, col]) => {
                Self::Remove(Remedy::Cell(Position::new(number(row)?, number(col)?)))
            }
            ("remove", _) => return Err(usage("remove row|col <index> | remove cell <row> <col>")),
            ("buy", [token]) => Self::Buy(powerup(token)?),
            ("buy", _) => return Err(usage("buy <POWERUP>")),
            ("use", [token, rest @ ..]) => Self::Use(powerup_action(powerup(token)?, rest)?),
            ("use", _) => return Err(usage("use <POWERUP> [row]")),
            ("undo" | "u", []) => Self::Undo,
            ("redo" | "r", []) => Self::Redo,
            ("give-up", []) => Self::GiveUp,
            ("restart", []) => Self::Restart,
            ("show" | "s", []) => Self::Show,
            ("stats", []) => Self::Stats,
            ("puzzles", []) => Self::Puzzles,
            ("help" | "h" | "?", []) => Self::Help,
            ("quit" | "q" | "exit", []) => Self::Quit,
            (
                "undo" | "u" | "redo" | "r" | "give-up" | "restart" | "show" | "s" | "stats"
                | "puzzles" | "help" | "h" | "?" | "quit" | "q" | "exit",
                _,
            ) => {
                return Err(CommandError::Usage {
                    usage: "this command takes no arguments",
                });
            }
            (name, _) => {
                return Err(CommandError::Unknown {
                    name: name.to_owned(),
                });
            }
        };
        Ok(command)
    }
}

fn usage(usage: &'static str) -> CommandError {
    CommandError::Usage { usage }
}

fn number<T>(text: &str) -> Result<T, CommandError>
where
    T: FromStr,
{
    text.parse().map_err(|_| CommandError::InvalidNumber {
        text: text.to_owned(),
    })
}

fn powerup(token: &str) -> Result<PowerupKind, CommandError> {
    token
        .to_ascii_uppercase()
        .replace('-', "_")
        .parse()
        .map_err(CommandError::Powerup)
}

fn powerup_action(kind: PowerupKind, rest: &[&str]) -> Result<PowerupAction, CommandError> {
    match (kind, rest) {
        (PowerupKind::ClearRow, [row]) => Ok(PowerupAction::ClearRow { row: number(row)? }),
        (PowerupKind::ClearRow, _) => Err(usage("use CLEAR_ROW <row>")),
        (PowerupKind::SwapTray, []) => Ok(PowerupAction::SwapTray),
        (PowerupKind::ExtraUndo, []) => Ok(PowerupAction::ExtraUndo),
        _ => Err(usage("use SWAP_TRAY | use EXTRA_UNDO")),
    }
}

pub(crate) const HELP: &str = "\
commands:
  place <slot> <row> <col>     place a tray shape (alias: p)
  preview <slot> <row> <col>   check whether a placement would fit
  undo | redo                  step through the history (aliases: u, r)
  remove row|col <index>       pay to empty a line
  remove cell <row> <col>      pay to empty a cell
  buy <POWERUP>                buy CLEAR_ROW, SWAP_TRAY or EXTRA_UNDO for 5 coins
  use <POWERUP> [row]          spend a power-up; CLEAR_ROW needs a row
  give-up | restart            end or restart the game
  show | stats | puzzles       print the board, records or puzzle packs
  quit                         leave (alias: q)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_place() {
        assert_eq!(
            "place 1 -1 3".parse(),
            Ok(Command::Place {
                slot: 1,
                row: -1,
                col: 3
            })
        );
        assert_eq!(
            "  p 0 0 0 ".parse(),
            Ok(Command::Place {
                slot: 0,
                row: 0,
                col: 0
            })
        );
        assert_eq!(
            "place 1 x 3".parse::<Command>(),
            Err(CommandError::InvalidNumber {
                text: "x".to_owned()
            })
        );
        assert!(matches!(
            "place 1 2".parse::<Command>(),
            Err(CommandError::Usage { .. })
        ));
    }

    #[test]
    fn test_parse_remove() {
        assert_eq!("remove row 3".parse(), Ok(Command::Remove(Remedy::Row(3))));
        assert_eq!(
            "remove column 0".parse(),
            Ok(Command::Remove(Remedy::Column(0)))
        );
        assert_eq!(
            "remove cell 2 5".parse(),
            Ok(Command::Remove(Remedy::Cell(Position::new(2, 5))))
        );
        assert!(matches!(
            "remove row -1".parse::<Command>(),
            Err(CommandError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_parse_powerups() {
        assert_eq!(
            "buy swap_tray".parse(),
            Ok(Command::Buy(PowerupKind::SwapTray))
        );
        assert_eq!(
            "use CLEAR_ROW 4".parse(),
            Ok(Command::Use(PowerupAction::ClearRow { row: 4 }))
        );
        assert_eq!(
            "use extra-undo".parse(),
            Ok(Command::Use(PowerupAction::ExtraUndo))
        );
        assert!(matches!(
            "use CLEAR_ROW".parse::<Command>(),
            Err(CommandError::Usage { .. })
        ));
        assert_eq!(
            "buy bomb".parse::<Command>(),
            Err(CommandError::Powerup(InvalidPowerupType {
                token: "BOMB".to_owned()
            }))
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("undo".parse(), Ok(Command::Undo));
        assert_eq!("give-up".parse(), Ok(Command::GiveUp));
        assert_eq!("q".parse(), Ok(Command::Quit));
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert!(matches!(
            "undo 2".parse::<Command>(),
            Err(CommandError::Usage { .. })
        ));
        assert_eq!(
            "jump".parse::<Command>(),
            Err(CommandError::Unknown {
                name: "jump".to_owned()
            })
        );
    }
}
