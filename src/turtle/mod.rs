//! Turtles that record every command they execute and can replay them.

mod parse;

pub use parse::{ParseError, parse_line, parse_program};

use crate::drawing::{Color, DrawSurface, DrawingContext};
use crate::math::{PI, Rotation, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Straight pieces used to draw one semicircular arc.
pub const ARC_SEGMENTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Turn {
    /// Turn in the drawing plane; yaw for the 3D turtle.
    Planar(f32),
    Euler(Rotation),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Forward(f32),
    Rotate(Turn),
    Arc { length: f32, clockwise: bool },
    PenUp,
    PenDown,
    SetColor(Color),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandLog {
    commands: Vec<Command>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl From<Vec<Command>> for CommandLog {
    fn from(commands: Vec<Command>) -> Self {
        Self { commands }
    }
}

/// Angles from the arc start around its center, relative to the heading.
fn arc_angles(clockwise: bool) -> impl Iterator<Item = f32> {
    let sweep = if clockwise { -PI } else { PI };
    (1..=ARC_SEGMENTS).map(move |i| PI + sweep * i as f32 / ARC_SEGMENTS as f32)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2d {
    pub position: Vec2,
    /// Heading in radians, counter-clockwise from +x.
    pub angle: f32,
    pub pen_down: bool,
}

impl Default for Pose2d {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            angle: 0.0,
            pen_down: true,
        }
    }
}

impl Pose2d {
    pub fn heading(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }
}

/// Planar turtle drawing directly in surface pixels.
#[derive(Debug, Clone, Default)]
pub struct Turtle2d {
    pose: Pose2d,
    color: Color,
    log: CommandLog,
}

impl Turtle2d {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> Pose2d {
        self.pose
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    /// Records and executes `command`.
    pub fn run<S: DrawSurface>(&mut self, command: Command, surface: &mut S) {
        self.log.push(command);
        self.execute(&command, surface);
    }

    /// Parses `source` completely before running any of it.
    pub fn run_script<S: DrawSurface>(
        &mut self,
        source: &str,
        surface: &mut S,
    ) -> Result<(), ParseError> {
        for command in parse_program(source)? {
            self.run(command, surface);
        }
        Ok(())
    }

    pub fn forward<S: DrawSurface>(&mut self, length: f32, surface: &mut S) {
        self.run(Command::Forward(length), surface);
    }

    pub fn rotate<S: DrawSurface>(&mut self, angle: f32, surface: &mut S) {
        self.run(Command::Rotate(Turn::Planar(angle)), surface);
    }

    pub fn pen_up<S: DrawSurface>(&mut self, surface: &mut S) {
        self.run(Command::PenUp, surface);
    }

    pub fn pen_down<S: DrawSurface>(&mut self, surface: &mut S) {
        self.run(Command::PenDown, surface);
    }

    pub fn reset(&mut self, clear_log: bool) {
        self.pose = Pose2d::default();
        self.color = Color::default();
        if clear_log {
            self.log.clear();
        }
    }

    /// Re-executes the log from the initial pose. The surface is not cleared.
    pub fn replay<S: DrawSurface>(&mut self, surface: &mut S) {
        self.reset(false);
        surface.set_color(self.color);
        let log = std::mem::take(&mut self.log);
        for command in log.commands() {
            self.execute(command, surface);
        }
        self.log = log;
    }

    fn execute<S: DrawSurface>(&mut self, command: &Command, surface: &mut S) {
        match *command {
            Command::Forward(length) => {
                let begin = self.pose.position;
                let end = begin + self.pose.heading() * length;
                if self.pose.pen_down {
                    surface.draw_segment(begin, end);
                }
                self.pose.position = end;
            }
            Command::Rotate(Turn::Planar(angle)) => self.pose.angle += angle,
            Command::Rotate(Turn::Euler(rotation)) => self.pose.angle += rotation.yaw,
            Command::Arc { length, clockwise } => {
                let heading = self.pose.heading();
                let left = heading.perp();
                let radius = length / 2.0;
                let center = self.pose.position + heading * radius;
                let end = self.pose.position + heading * length;

                if self.pose.pen_down {
                    let mut previous = self.pose.position;
                    for theta in arc_angles(clockwise) {
                        let next = center + (heading * theta.cos() + left * theta.sin()) * radius;
                        surface.draw_segment(previous, next);
                        previous = next;
                    }
                }
                self.pose.position = end;
            }
            Command::PenUp => self.pose.pen_down = false,
            Command::PenDown => self.pose.pen_down = true,
            Command::SetColor(color) => {
                self.color = color;
                surface.set_color(color);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose3d {
    pub position: Vec3,
    pub rotation: Rotation,
    pub pen_down: bool,
}

impl Default for Pose3d {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Rotation::ZERO,
            pen_down: true,
        }
    }
}

impl Pose3d {
    /// `+z` in turtle space, expressed in world space.
    ///
    /// Uses [`Rotation::apply`], so a camera sharing this pose sees the heading as `+z`.
    pub fn heading(&self) -> Vec3 {
        self.rotation.apply(Vec3::UNIT_Z)
    }

    pub fn left(&self) -> Vec3 {
        self.rotation.apply(-Vec3::UNIT_X)
    }
}

/// Spatial turtle whose strokes go through a camera.
#[derive(Debug, Clone, Default)]
pub struct Turtle3d {
    pose: Pose3d,
    color: Color,
    log: CommandLog,
}

impl Turtle3d {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: CommandLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    pub fn pose(&self) -> Pose3d {
        self.pose
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    pub fn run<S: DrawSurface>(&mut self, command: Command, ctx: &mut DrawingContext<S>) {
        self.log.push(command);
        self.execute(&command, ctx);
    }

    pub fn run_script<S: DrawSurface>(
        &mut self,
        source: &str,
        ctx: &mut DrawingContext<S>,
    ) -> Result<(), ParseError> {
        for command in parse_program(source)? {
            self.run(command, ctx);
        }
        Ok(())
    }

    pub fn forward<S: DrawSurface>(&mut self, length: f32, ctx: &mut DrawingContext<S>) {
        self.run(Command::Forward(length), ctx);
    }

    pub fn rotate<S: DrawSurface>(&mut self, delta: Rotation, ctx: &mut DrawingContext<S>) {
        self.run(Command::Rotate(Turn::Euler(delta)), ctx);
    }

    pub fn pen_up<S: DrawSurface>(&mut self, ctx: &mut DrawingContext<S>) {
        self.run(Command::PenUp, ctx);
    }

    pub fn pen_down<S: DrawSurface>(&mut self, ctx: &mut DrawingContext<S>) {
        self.run(Command::PenDown, ctx);
    }

    pub fn reset(&mut self, clear_log: bool) {
        self.pose = Pose3d::default();
        self.color = Color::default();
        if clear_log {
            self.log.clear();
        }
    }

    /// Re-executes the log from the initial pose under the context's current camera.
    pub fn replay<S: DrawSurface>(&mut self, ctx: &mut DrawingContext<S>) {
        self.reset(false);
        ctx.set_color(self.color);
        let log = std::mem::take(&mut self.log);
        for command in log.commands() {
            self.execute(command, ctx);
        }
        self.log = log;
    }

    fn execute<S: DrawSurface>(&mut self, command: &Command, ctx: &mut DrawingContext<S>) {
        match *command {
            Command::Forward(length) => {
                let begin = self.pose.position;
                let end = begin + self.pose.heading() * length;
                if self.pose.pen_down {
                    ctx.draw_line([begin, end]);
                }
                self.pose.position = end;
            }
            Command::Rotate(Turn::Euler(delta)) => self.pose.rotation += delta,
            Command::Rotate(Turn::Planar(angle)) => self.pose.rotation.yaw += angle,
            Command::Arc { length, clockwise } => {
                let heading = self.pose.heading();
                let left = self.pose.left();
                let radius = length / 2.0;
                let center = self.pose.position + heading * radius;
                let end = self.pose.position + heading * length;

                if self.pose.pen_down {
                    let mut previous = self.pose.position;
                    for theta in arc_angles(clockwise) {
                        let next = center + (heading * theta.cos() + left * theta.sin()) * radius;
                        ctx.draw_line([previous, next]);
                        previous = next;
                    }
                }
                self.pose.position = end;
            }
            Command::PenUp => self.pose.pen_down = false,
            Command::PenDown => self.pose.pen_down = true,
            Command::SetColor(color) => {
                self.color = color;
                ctx.set_color(color);
            }
        }
    }
}
