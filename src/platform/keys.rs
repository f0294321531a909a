//! Key mapping from browser keyboard events to game commands.

use crate::sim::{Command, GameKind};

/// A raw key transition, `key` as reported by `KeyboardEvent.key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn down(key: &str) -> Self {
        Self {
            key: key.to_string(),
            pressed: true,
        }
    }

    pub fn up(key: &str) -> Self {
        Self {
            key: key.to_string(),
            pressed: false,
        }
    }
}

/// Map a key for the given game. Unknown keys map to nothing.
pub fn map_key(game: GameKind, key: &str) -> Option<Command> {
    match game {
        GameKind::Snake => match key {
            "ArrowUp" | "w" | "W" => Some(Command::MoveUp),
            "ArrowDown" | "s" | "S" => Some(Command::MoveDown),
            "ArrowLeft" | "a" | "A" => Some(Command::MoveLeft),
            "ArrowRight" | "d" | "D" => Some(Command::MoveRight),
            _ => None,
        },
        GameKind::Pong => match key {
            "ArrowUp" | "w" | "W" => Some(Command::MoveUp),
            "ArrowDown" | "s" | "S" => Some(Command::MoveDown),
            _ => None,
        },
        GameKind::Tetris => match key {
            "ArrowLeft" | "a" | "A" => Some(Command::MoveLeft),
            "ArrowRight" | "d" | "D" => Some(Command::MoveRight),
            "ArrowDown" | "s" | "S" => Some(Command::SoftDrop),
            "ArrowUp" | "w" | "W" | " " => Some(Command::Rotate),
            "Enter" => Some(Command::HardDrop),
            _ => None,
        },
    }
}

/// Keys the browser should not act on while a game has focus
pub fn should_prevent_default(key: &str) -> bool {
    matches!(
        key,
        "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | " "
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_keys() {
        assert_eq!(map_key(GameKind::Snake, "ArrowUp"), Some(Command::MoveUp));
        assert_eq!(map_key(GameKind::Snake, "ArrowLeft"), Some(Command::MoveLeft));
        assert_eq!(map_key(GameKind::Snake, "D"), Some(Command::MoveRight));
        assert_eq!(map_key(GameKind::Snake, "s"), Some(Command::MoveDown));
        assert_eq!(map_key(GameKind::Snake, " "), None);
    }

    #[test]
    fn test_pong_keys() {
        assert_eq!(map_key(GameKind::Pong, "w"), Some(Command::MoveUp));
        assert_eq!(map_key(GameKind::Pong, "ArrowDown"), Some(Command::MoveDown));
        assert_eq!(map_key(GameKind::Pong, "ArrowLeft"), None);
    }

    #[test]
    fn test_tetris_keys() {
        assert_eq!(map_key(GameKind::Tetris, "ArrowUp"), Some(Command::Rotate));
        assert_eq!(map_key(GameKind::Tetris, " "), Some(Command::Rotate));
        assert_eq!(map_key(GameKind::Tetris, "W"), Some(Command::Rotate));
        assert_eq!(map_key(GameKind::Tetris, "ArrowDown"), Some(Command::SoftDrop));
        assert_eq!(map_key(GameKind::Tetris, "Enter"), Some(Command::HardDrop));
        assert_eq!(map_key(GameKind::Tetris, "a"), Some(Command::MoveLeft));
    }

    #[test]
    fn test_unknown_keys() {
        for game in GameKind::ALL {
            assert_eq!(map_key(game, "q"), None);
            assert_eq!(map_key(game, "Escape"), None);
            assert_eq!(map_key(game, ""), None);
        }
    }

    #[test]
    fn test_prevent_default() {
        assert!(should_prevent_default("ArrowDown"));
        assert!(should_prevent_default(" "));
        assert!(!should_prevent_default("Enter"));
    }
}
