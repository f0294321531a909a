//! Projection from engine state to a frame
//!
//! Every function here reads state and writes a fresh [`Frame`]; nothing is
//! mutated, so projection can run at display rate between ticks.

use super::frame::{Colors, Frame, TextAlign};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{Engine, GamePhase, PongState, SnakeState, TetrisState};

const HUD_TEXT: f32 = 14.0;
const OVERLAY_TEXT: f32 = 20.0;

/// Draw any engine
pub fn project(engine: &Engine, settings: &Settings) -> Frame {
    match engine {
        Engine::Snake(state) => project_snake(state, settings),
        Engine::Pong(state) => project_pong(state, settings),
        Engine::Tetris(state) => project_tetris(state, settings),
    }
}

fn background(width: u32, height: u32, colors: &Colors) -> Frame {
    let mut frame = Frame::new(width, height);
    frame.rect(0.0, 0.0, width as f32, height as f32, colors.background);
    frame
}

/// Vertical and horizontal 1px lines every `cell` pixels
fn grid(frame: &mut Frame, cols: u32, rows: u32, cell: f32, color: [f32; 4]) {
    let (w, h) = (cols as f32 * cell, rows as f32 * cell);
    for c in 0..=cols {
        frame.rect(c as f32 * cell, 0.0, 1.0, h, color);
    }
    for r in 0..=rows {
        frame.rect(0.0, r as f32 * cell, w, 1.0, color);
    }
}

fn overlay(frame: &mut Frame, phase: GamePhase, colors: &Colors) {
    let text = match phase {
        GamePhase::Idle => "PRESS START",
        GamePhase::Terminal => "GAME OVER",
        GamePhase::Running => return,
    };
    let (x, y) = (frame.width as f32 / 2.0, frame.height as f32 / 2.0);
    frame.text(text, x, y, OVERLAY_TEXT, colors.block, TextAlign::Center);
}

pub fn project_snake(state: &SnakeState, settings: &Settings) -> Frame {
    let colors = Colors::for_palette(settings.palette);
    let cell = SNAKE_CELL as f32;
    let mut frame = background(
        SNAKE_COLS as u32 * SNAKE_CELL,
        SNAKE_ROWS as u32 * SNAKE_CELL,
        &colors,
    );
    if settings.show_grid {
        grid(&mut frame, SNAKE_COLS as u32, SNAKE_ROWS as u32, cell, colors.grid);
    }

    // Inset by one pixel so adjacent segments read as separate blocks
    for seg in &state.body {
        frame.rect(
            seg.x as f32 * cell + 1.0,
            seg.y as f32 * cell + 1.0,
            cell - 2.0,
            cell - 2.0,
            colors.block,
        );
    }
    frame.rect(
        state.food.x as f32 * cell + 1.0,
        state.food.y as f32 * cell + 1.0,
        cell - 2.0,
        cell - 2.0,
        colors.active,
    );

    frame.text(
        format!("Score: {}", state.score),
        10.0,
        20.0,
        HUD_TEXT,
        colors.block,
        TextAlign::Left,
    );
    overlay(&mut frame, state.phase, &colors);
    frame
}

pub fn project_pong(state: &PongState, settings: &Settings) -> Frame {
    let colors = Colors::for_palette(settings.palette);
    let mut frame = background(PONG_WIDTH as u32, PONG_HEIGHT as u32, &colors);

    // Dashed center line
    let mut y = 0.0;
    while y < PONG_HEIGHT {
        frame.rect(PONG_WIDTH / 2.0 - 1.0, y, 2.0, 10.0, colors.grid);
        y += 20.0;
    }

    for (paddle, x) in [
        (&state.player, 0.0),
        (&state.opponent, PONG_WIDTH - PADDLE_WIDTH),
    ] {
        frame.rect(x, paddle.y, PADDLE_WIDTH, PADDLE_HEIGHT, colors.block);
    }
    frame.rect(
        state.ball.pos.x,
        state.ball.pos.y,
        BALL_SIZE,
        BALL_SIZE,
        colors.active,
    );

    frame.text(
        state.player_score.to_string(),
        PONG_WIDTH / 4.0,
        30.0,
        OVERLAY_TEXT,
        colors.block,
        TextAlign::Center,
    );
    frame.text(
        state.opponent_score.to_string(),
        PONG_WIDTH * 3.0 / 4.0,
        30.0,
        OVERLAY_TEXT,
        colors.block,
        TextAlign::Center,
    );
    overlay(&mut frame, state.phase, &colors);
    frame
}

pub fn project_tetris(state: &TetrisState, settings: &Settings) -> Frame {
    let colors = Colors::for_palette(settings.palette);
    let cell = TETRIS_CELL as f32;
    let (cols, rows) = (BOARD_WIDTH as u32, BOARD_HEIGHT as u32);
    let mut frame = background(cols * TETRIS_CELL, rows * TETRIS_CELL, &colors);

    // Nothing to draw until a piece exists; a topped-out game still shows
    // its stack
    if state.active.is_none() && state.phase != GamePhase::Terminal {
        return frame;
    }

    if settings.show_grid {
        grid(&mut frame, cols, rows, cell, colors.grid);
    }

    for (y, row) in state.board.rows().iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            if value != 0 {
                frame.rect(
                    x as f32 * cell + 1.0,
                    y as f32 * cell + 1.0,
                    cell - 2.0,
                    cell - 2.0,
                    colors.block,
                );
            }
        }
    }

    if let Some(piece) = &state.active {
        // Landing preview as outlines in the grid color
        if let Some(landing) = state.landing_row() {
            if landing != piece.y {
                let ghost = piece.shifted(0, landing - piece.y);
                for (x, y) in ghost.cells() {
                    frame.rect(
                        x as f32 * cell + 3.0,
                        y as f32 * cell + 3.0,
                        cell - 6.0,
                        cell - 6.0,
                        colors.grid,
                    );
                }
            }
        }
        for (x, y) in piece.cells() {
            frame.rect(
                x as f32 * cell + 1.0,
                y as f32 * cell + 1.0,
                cell - 2.0,
                cell - 2.0,
                colors.active,
            );
        }
    }

    let hud = [
        format!("Score: {}", state.score),
        format!("Lines: {}", state.lines),
        format!("Level: {}", state.level),
    ];
    for (i, line) in hud.into_iter().enumerate() {
        frame.text(
            line,
            5.0,
            15.0 + i as f32 * 16.0,
            HUD_TEXT,
            colors.block,
            TextAlign::Left,
        );
    }
    if let Some(next) = state.next {
        frame.text(
            format!("Next: {:?}", next),
            frame.width as f32 - 5.0,
            15.0,
            HUD_TEXT,
            colors.block,
            TextAlign::Right,
        );
    }

    overlay(&mut frame, state.phase, &colors);
    frame
}
