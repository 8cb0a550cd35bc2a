use log::debug;
use sdl2::pixels::{Color, PixelFormatEnum};

use emu8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use emu8_core::FrameBuffer;

pub const DEFAULT_SCALE: u32 = 12;
pub const DEFAULT_FOREGROUND: Color = Color::RGB(255, 120, 255);
pub const DEFAULT_BACKGROUND: Color = Color::RGB(35, 20, 35);

/// # Display
/// The Chip-8 display is composed of 64x32 on/off pixels.
/// Lit pixels are drawn in the foreground colour over the background colour.
/// The display only gets a call to `render` when the Chip-8 FrameBuffer is updated.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
    foreground: Color,
    background: Color,
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `scale` the size multiplier for each pixel
    /// * `foreground` the colour of lit pixels
    /// * `background` the colour of unlit pixels
    pub fn new(
        sdl: &sdl2::Sdl,
        scale: u32,
        foreground: Color,
        background: Color,
    ) -> Result<Self, String> {
        let width = DISPLAY_WIDTH as u32 * scale;
        let height = DISPLAY_HEIGHT as u32 * scale;

        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window("Emu-8", width, height)
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;

        canvas.set_draw_color(background);
        canvas.clear();
        canvas.present();
        debug!("opened {}x{} window", width, height);

        Ok(Display {
            canvas,
            foreground,
            background,
        })
    }

    /// Formats a Chip-8 FrameBuffer for rendering as an SDL2 texture.
    ///
    /// An SDL2 RGB24 texture is a 1D array of bytes that represent concatenated rows of RGB pixels.
    /// The FrameBuffer is already row-major so each pixel just becomes its colour's three bytes.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    /// * `foreground` the colour of lit pixels
    /// * `background` the colour of unlit pixels
    fn frame_to_sdl_texture(frame: &FrameBuffer, foreground: Color, background: Color) -> Vec<u8> {
        frame
            .iter()
            .map(|&lit| if lit { foreground } else { background })
            .flat_map(|colour| vec![colour.r, colour.g, colour.b])
            .collect()
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and renders it.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        let pixels = Display::frame_to_sdl_texture(frame, self.foreground, self.background);
        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            for (row, line) in pixels.chunks(DISPLAY_WIDTH * 3).enumerate() {
                buffer[row * pitch..row * pitch + line.len()].copy_from_slice(line);
            }
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_sdl_texture() {
        let mut frame: FrameBuffer = [false; 64 * 32];
        frame[1] = true;
        frame[64] = true;
        let white = Color::RGB(255, 255, 255);
        let black = Color::RGB(0, 0, 0);
        let frame = Display::frame_to_sdl_texture(&frame, white, black);

        let mut expected: Vec<u8> = vec![0; 6144];
        expected[0..6].copy_from_slice(&[0, 0, 0, 255, 255, 255]);
        expected[192..198].copy_from_slice(&[255, 255, 255, 0, 0, 0]);

        assert_eq!(frame, expected);
    }

    #[test]
    fn test_frame_to_sdl_texture_uses_colours() {
        let mut frame: FrameBuffer = [false; 64 * 32];
        frame[2047] = true;
        let frame = Display::frame_to_sdl_texture(&frame, DEFAULT_FOREGROUND, DEFAULT_BACKGROUND);

        assert_eq!(frame[0..3], [35, 20, 35]);
        assert_eq!(frame[6141..], [255, 120, 255]);
    }
}
