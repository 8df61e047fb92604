use std::{collections::HashMap, fmt::Display};

use itertools::Itertools;
use libintcode::{Channel, Value};
use log::debug;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use thiserror::Error;

use crate::navigator::{Navigator, Point, Turn};

#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Black = 0,
    White = 1,
}

impl Color {
    pub fn glyph(self) -> char {
        match self {
            Color::Black => '.',
            Color::White => '█',
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaintError {
    #[error("Invalid panel color {0}")]
    InvalidColor(Value),
    #[error("Invalid turn direction {0}")]
    InvalidTurn(Value),
    #[error("No command queued")]
    MissingCommand,
}

/// Panel grid walked by the robot. Reads (color, turn) pairs from its input
/// channel and answers each move with the color under the robot.
#[derive(Debug, Default)]
pub struct Hull {
    panels: HashMap<Point, Color>,
    pub navigator: Navigator,
    input: Channel,
    output: Option<Channel>,
    end: bool,
}

impl Hull {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_panels(panels: impl IntoIterator<Item = (Point, Color)>) -> Self {
        Self {
            panels: panels.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn input_channel(&self) -> Channel {
        self.input.clone()
    }

    /// Send panel colors to `channel` from now on.
    pub fn link(&mut self, channel: Channel) -> Option<Channel> {
        self.output.replace(channel)
    }

    /// Forget every painted panel and return the navigator to the origin.
    pub fn reset(&mut self) {
        self.panels.clear();
        self.navigator = Navigator::new();
        self.input.reset(&[]);
        self.end = false;
    }

    pub fn panels(&self) -> &HashMap<Point, Color> {
        &self.panels
    }

    pub fn color_at(&self, point: Point) -> Color {
        self.panels.get(&point).copied().unwrap_or_default()
    }

    /// Panels painted at least once, whatever their current color.
    pub fn painted_count(&self) -> usize {
        self.panels.len()
    }

    pub fn finished(&self) -> bool {
        self.end
    }

    fn next_command(&self) -> Result<Value, PaintError> {
        self.input.recv().ok_or(PaintError::MissingCommand)
    }

    fn send(&self, color: Color) {
        if let Some(output) = &self.output {
            output.send(color as Value);
        }
    }

    /// Report the color of the starting panel.
    pub fn start(&self, color: Color) {
        self.send(color);
    }

    pub fn paint_panel(&mut self) -> Result<(), PaintError> {
        let value = self.next_command()?;
        let color = Color::from_i64(value).ok_or(PaintError::InvalidColor(value))?;
        self.panels.insert(self.navigator.position, color);
        Ok(())
    }

    pub fn move_navigator(&mut self) -> Result<(), PaintError> {
        let value = self.next_command()?;
        let turn = Turn::from_i64(value).ok_or(PaintError::InvalidTurn(value))?;
        let position = self.navigator.step(turn);
        self.send(self.color_at(position));
        Ok(())
    }

    /// Handle every complete (color, turn) pair queued so far. Marks the hull
    /// finished once its input is closed. Returns the pairs handled.
    pub fn execute(&mut self) -> Result<usize, PaintError> {
        let mut handled = 0;
        while self.input.len() >= 2 {
            self.paint_panel()?;
            self.move_navigator()?;
            handled += 1;
        }
        if self.input.is_closed() && !self.end {
            debug!("hull: input closed after {} panels", self.painted_count());
            self.end = true;
        }
        Ok(handled)
    }

    /// Render the bounding box of every touched panel, top row first.
    pub fn display(&self) -> Vec<String> {
        let xs = self.panels.keys().map(|p| p.x).minmax().into_option();
        let ys = self.panels.keys().map(|p| p.y).minmax().into_option();
        let (Some((min_x, max_x)), Some((min_y, max_y))) = (xs, ys) else {
            return Vec::new();
        };

        (min_y..=max_y)
            .map(|y| {
                (min_x..=max_x)
                    .map(|x| self.color_at(Point::new(x, y)).glyph())
                    .collect()
            })
            .collect()
    }
}

impl Display for Hull {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display().iter().join("\n"))
    }
}
