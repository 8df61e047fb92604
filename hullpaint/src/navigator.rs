use num_derive::FromPrimitive;

/// Grid coordinate. `y` grows downward, so heading up decrements it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, heading: Heading) -> Self {
        let (dx, dy) = heading.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left = 0,
    Right = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heading {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Heading {
    pub fn turn(self, turn: Turn) -> Self {
        match (self, turn) {
            (Heading::Up, Turn::Left) | (Heading::Down, Turn::Right) => Heading::Left,
            (Heading::Up, Turn::Right) | (Heading::Down, Turn::Left) => Heading::Right,
            (Heading::Left, Turn::Left) | (Heading::Right, Turn::Right) => Heading::Down,
            (Heading::Left, Turn::Right) | (Heading::Right, Turn::Left) => Heading::Up,
        }
    }

    fn delta(self) -> (i64, i64) {
        match self {
            Heading::Up => (0, -1),
            Heading::Right => (1, 0),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    pub position: Point,
    pub heading: Heading,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotate a quarter turn, then move one panel forward.
    pub fn step(&mut self, turn: Turn) -> Point {
        self.heading = self.heading.turn(turn);
        self.position = self.position.offset(self.heading);
        self.position
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn full_turns() {
        let mut heading = Heading::Up;
        for expected in [Heading::Right, Heading::Down, Heading::Left, Heading::Up] {
            heading = heading.turn(Turn::Right);
            assert_eq!(heading, expected);
        }
        for expected in [Heading::Left, Heading::Down, Heading::Right, Heading::Up] {
            heading = heading.turn(Turn::Left);
            assert_eq!(heading, expected);
        }
    }

    #[test]
    fn steps() {
        let mut navigator = Navigator::new();
        assert_eq!(navigator.step(Turn::Left), Point::new(-1, 0));
        assert_eq!(navigator.step(Turn::Left), Point::new(-1, 1));
        assert_eq!(navigator.step(Turn::Left), Point::new(0, 1));
        assert_eq!(navigator.step(Turn::Left), Point::new(0, 0));
        assert_eq!(navigator.heading, Heading::Up);

        assert_eq!(navigator.step(Turn::Right), Point::new(1, 0));
        assert_eq!(navigator.heading, Heading::Right);
    }
}
