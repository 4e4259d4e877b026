//! Terminal rendering.
//!
//! [`AsciiRenderer`] opens its surface on [`Event::SimStart`], draws every
//! entity with a [`Transform`] and a [`Sprite`] on [`Event::Render`] and
//! closes the surface on [`Event::SimEnd`]. Brighter sprites use denser
//! glyphs.

use std::io::{self, Stdout, Write};

use anyhow::{Context as _, bail};
use components::Sprite;
use sim_math::{Bounds, IVec2, Transform};
use sim_system::{Context, Event, Interest, System};
use tracing::{debug, trace};

/// Glyphs ordered from darkest to brightest.
const RAMP: &[u8] = b".:-=+*#%@";
const EMPTY: u8 = b' ';

/// Grid size and pacing of an [`AsciiRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererConfig {
    /// Grid width in characters.
    pub columns: usize,
    /// Grid height in characters.
    pub rows: usize,
    /// The world area mapped onto the grid.
    pub bounds: Bounds,
    /// Draw every n-th render event. `0` and `1` both draw every frame.
    pub frame_interval: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 40,
            bounds: Bounds::WORLD,
            frame_interval: 1,
        }
    }
}

/// Draws the world as a character grid into a writer.
pub struct AsciiRenderer<W: Write> {
    out: W,
    config: RendererConfig,
    grid: Vec<u8>,
    open: bool,
    renders: u64,
    frames: u64,
}

impl AsciiRenderer<Stdout> {
    /// Render to standard output.
    #[must_use]
    pub fn to_stdout(config: RendererConfig) -> Self {
        Self::new(io::stdout(), config)
    }
}

impl<W: Write> AsciiRenderer<W> {
    #[must_use]
    pub fn new(out: W, config: RendererConfig) -> Self {
        Self {
            out,
            grid: vec![EMPTY; config.columns * config.rows],
            config,
            open: false,
            renders: 0,
            frames: 0,
        }
    }

    /// Number of frames drawn so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns `true` between `SimStart` and `SimEnd`.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn cell(&self, point: IVec2) -> Option<(usize, usize)> {
        let bounds = self.config.bounds;
        if !bounds.contains(point) {
            return None;
        }
        let extent = bounds.extent();
        let offset = point - bounds.min;
        let scale = |value: i32, size: i32, cells: usize| {
            let cells = i64::try_from(cells).unwrap_or(i64::MAX);
            usize::try_from(i64::from(value) * cells / i64::from(size)).ok()
        };
        Some((
            scale(offset.x, extent.x, self.config.columns)?,
            scale(offset.y, extent.y, self.config.rows)?,
        ))
    }

    fn plot(&mut self, transform: &Transform, sprite: &Sprite) {
        if self.grid.is_empty() {
            return;
        }
        let glyph = RAMP[usize::from(sprite.color.luma()) * (RAMP.len() - 1) / 255];
        let bounds = self.config.bounds;
        let from = bounds.clamp(transform.position);
        let size = IVec2::new(sprite.width, sprite.height);
        let to = bounds.clamp(transform.position + size - IVec2::ONE);
        let (Some((x0, y0)), Some((x1, y1))) = (self.cell(from), self.cell(to)) else {
            return;
        };
        for y in y0..=y1.min(self.config.rows - 1) {
            for x in x0..=x1.min(self.config.columns - 1) {
                self.grid[y * self.config.columns + x] = glyph;
            }
        }
    }

    fn draw(&mut self, ctx: &Context<'_>) -> anyhow::Result<()> {
        self.grid.fill(EMPTY);
        let mut sprites = Vec::new();
        ctx.view::<(Transform, Sprite)>()?
            .for_each_components(|t, s| sprites.push((*t, *s)))?;
        for (t, s) in &sprites {
            self.plot(t, s);
        }

        writeln!(self.out, "cycle {}", ctx.cycle())?;
        if self.config.columns > 0 {
            for row in self.grid.chunks(self.config.columns) {
                self.out.write_all(row)?;
                self.out.write_all(b"\n")?;
            }
        }
        self.out.flush()?;
        self.frames += 1;
        trace!(cycle = ctx.cycle(), sprites = sprites.len(), "frame drawn");
        Ok(())
    }
}

impl<W: Write> System for AsciiRenderer<W> {
    fn name(&self) -> &str {
        "ascii_renderer"
    }

    fn interest(&self, event: Event) -> Interest {
        match event {
            Event::SimStart | Event::SimEnd => Interest::PLAIN,
            Event::Render => Interest::CONTEXTUAL,
            _ => Interest::NONE,
        }
    }

    fn on_event(&mut self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::SimStart => {
                writeln!(
                    self.out,
                    "ascii renderer {}x{}",
                    self.config.columns, self.config.rows
                )
                .context("failed to open render surface")?;
                self.open = true;
                debug!(
                    columns = self.config.columns,
                    rows = self.config.rows,
                    "render surface opened"
                );
            }
            Event::SimEnd => {
                self.open = false;
                writeln!(self.out, "rendered {} frames", self.frames)?;
                self.out.flush().context("failed to close render surface")?;
                debug!(frames = self.frames, "render surface closed");
            }
            _ => {}
        }
        Ok(())
    }

    fn on_event_with_context(
        &mut self,
        _event: Event,
        ctx: &mut Context<'_>,
    ) -> anyhow::Result<()> {
        if !self.open {
            bail!("render surface is not open");
        }
        let interval = u64::from(self.config.frame_interval.max(1));
        let due = self.renders % interval == 0;
        self.renders += 1;
        if due {
            self.draw(ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use components::Color;
    use sim_component::{Directory, EntityId};

    use super::*;

    fn small() -> RendererConfig {
        RendererConfig {
            columns: 4,
            rows: 2,
            bounds: Bounds::new(IVec2::ZERO, IVec2::new(39, 19)),
            frame_interval: 1,
        }
    }

    fn output(renderer: AsciiRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_draws_sprites_by_brightness() {
        let directory = Directory::new();
        directory
            .entity_mut(EntityId::from_raw(0))
            .attach(Transform::new(0, 0))
            .unwrap()
            .attach(Sprite::new(Color::rgb(255, 255, 255)))
            .unwrap();
        directory
            .entity_mut(EntityId::from_raw(1))
            .attach(Transform::new(35, 15))
            .unwrap()
            .attach(Sprite::new(Color::BLACK).with_size(1, 1))
            .unwrap();

        let mut renderer = AsciiRenderer::new(Vec::new(), small());
        renderer.on_event(Event::SimStart).unwrap();
        assert!(renderer.is_open());
        let mut ctx = Context::new(3, &directory);
        renderer.on_event_with_context(Event::Render, &mut ctx).unwrap();
        renderer.on_event(Event::SimEnd).unwrap();
        assert!(!renderer.is_open());

        assert_eq!(
            output(renderer),
            "ascii renderer 4x2\ncycle 3\n@   \n   .\nrendered 1 frames\n"
        );
    }

    #[test]
    fn test_frame_interval() {
        let directory = Directory::new();
        let mut renderer = AsciiRenderer::new(
            Vec::new(),
            RendererConfig {
                frame_interval: 3,
                ..small()
            },
        );
        renderer.on_event(Event::SimStart).unwrap();
        for cycle in 0..7 {
            let mut ctx = Context::new(cycle, &directory);
            renderer.on_event_with_context(Event::Render, &mut ctx).unwrap();
        }
        assert_eq!(renderer.frames(), 3);
    }

    #[test]
    fn test_render_before_start_fails() {
        let directory = Directory::new();
        let mut renderer = AsciiRenderer::new(Vec::new(), small());
        let mut ctx = Context::new(0, &directory);
        assert!(
            renderer
                .on_event_with_context(Event::Render, &mut ctx)
                .is_err()
        );
    }
}
