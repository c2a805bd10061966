use raylib::core::texture::RaylibTexture2D;
use raylib::prelude::*;

/// Buffer de pixeles RGBA8 en CPU. El renderer escribe aqui cada tick y la
/// capa de presentacion solo lo lee (sube los bytes a una textura).
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    color_buffer: Vec<Color>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let bg = Color::new(20, 20, 25, 255);
        Self {
            width,
            height,
            background_color: bg,
            color_buffer: vec![bg; (width * height) as usize],
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.color_buffer.fill(self.background_color);
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.color_buffer[(y * self.width + x) as usize] = color;
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        if x < self.width && y < self.height {
            return self.color_buffer[(y * self.width + x) as usize];
        }
        self.background_color
    }

    /// Rectangulo relleno en coordenadas de pantalla (recortado al buffer).
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.color_buffer[(py as u32 * self.width + px as u32) as usize] = color;
            }
        }
    }

    pub fn pixels(&self) -> &[Color] {
        &self.color_buffer
    }

    /// Sube los pixeles a una textura persistente para dibujarla de un golpe.
    pub fn upload_to_texture(&self, tex: &mut Texture2D) {
        // &[Color] -> &[u8] (RGBA8) sin copiar
        let byte_len = self.color_buffer.len() * std::mem::size_of::<Color>();
        let bytes: &[u8] = unsafe {
            std::slice::from_raw_parts(self.color_buffer.as_ptr() as *const u8, byte_len)
        };
        let _ = tex.update_texture(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_pixel() {
        let mut fb = Framebuffer::new(8, 8);
        let red = Color::new(255, 0, 0, 255);
        fb.set_pixel(3, 5, red);
        assert_eq!(fb.get_pixel(3, 5), red);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut fb = Framebuffer::new(4, 4);
        fb.set_pixel(100, 100, Color::WHITE);
        assert_eq!(fb.get_pixel(100, 100), fb.background_color);
    }

    #[test]
    fn clear_restores_background() {
        let mut fb = Framebuffer::new(4, 4);
        fb.set_pixel(1, 1, Color::WHITE);
        fb.clear();
        assert_eq!(fb.get_pixel(1, 1), fb.background_color);
    }

    #[test]
    fn draw_rect_is_clipped() {
        let mut fb = Framebuffer::new(4, 4);
        let c = Color::new(10, 200, 30, 255);
        fb.draw_rect(-2, -2, 4, 4, c);
        assert_eq!(fb.get_pixel(0, 0), c);
        assert_eq!(fb.get_pixel(1, 1), c);
        assert_eq!(fb.get_pixel(2, 2), fb.background_color);
    }
}
