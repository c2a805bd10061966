use raylib::prelude::*;

use crate::framebuffer::Framebuffer;
use crate::level::{CELL, WALL_H};
use crate::nav::Navigator;
use crate::textures::{wall_variant_for, TextureManager};

/// Campo de vision horizontal (60 grados).
const FOV: f32 = std::f32::consts::PI / 3.0;
/// Un rayo cada 2 columnas; las columnas saltadas repiten el resultado.
const RAY_STEP: usize = 2;
/// Tope de pasos del DDA; alcanza de sobra para grids de hasta 25x25.
const DDA_MAX_STEPS: u32 = 64;

const GOAL_COLOR: Color = Color::new(20, 220, 80, 255);
const STAIR_COLOR: Color = Color::new(235, 170, 40, 255);

const MINIMAP_SCALE: i32 = 8;
const MINIMAP_PAD: i32 = 10;

/// Atenuacion por distancia de mundo, con piso para no llegar a negro.
#[inline]
fn distance_shade(world_dist: f32) -> f32 {
    (255.0 - (world_dist * 0.6).min(220.0)) / 255.0
}

#[inline]
fn scale_color(c: Color, kr: f32, kg: f32, kb: f32) -> Color {
    Color::new(
        (c.r as f32 * kr) as u8,
        (c.g as f32 * kg) as u8,
        (c.b as f32 * kb) as u8,
        255,
    )
}

/// Renderer por software: un rayo por columna contra el grid del piso activo,
/// piso/techo proyectados por fila, y overlays (marcador y minimapa) probados
/// contra el buffer de profundidad por columna.
pub struct Renderer {
    pub frame: Framebuffer,
    depth: Vec<f32>,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: Framebuffer::new(width, height),
            depth: vec![f32::MAX; width as usize],
        }
    }

    /// Distancia perpendicular de pared por columna del ultimo frame.
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    pub fn render(&mut self, nav: &Navigator, textures: &TextureManager) {
        let cam = &nav.camera;
        let floor = nav.active_floor();

        let w = self.frame.width as i32;
        let h = self.frame.height as i32;
        let half_h = h as f32 * 0.5;

        // posicion de camara en unidades de celda del piso activo
        let pos_x = (cam.x - floor.start_x) / CELL;
        let pos_z = (cam.z - floor.start_z) / CELL;

        let (sy, cy) = cam.yaw.sin_cos();
        let forward_x = -sy;
        let forward_z = cy;
        let plane_scale = (FOV * 0.5).tan();
        let proj_scale = (w as f32 * 0.5) / plane_scale;
        let plane_x = cy * plane_scale;
        let plane_z = sy * plane_scale;
        let y_offset = -cam.pitch * half_h;
        let horizon = (half_h + y_offset) as i32;

        let tint = nav.level.wall_color;
        let (tr, tg, tb) = (
            tint.r as f32 / 255.0,
            tint.g as f32 / 255.0,
            tint.b as f32 / 255.0,
        );

        self.frame.clear();
        self.depth.fill(f32::MAX);

        // 1) piso y techo primero: las paredes pintan encima y el z-buffer
        //    solo tiene que proteger los overlays posteriores
        let ray0_x = forward_x - plane_x;
        let ray0_z = forward_z - plane_z;
        let ray1_x = forward_x + plane_x;
        let ray1_z = forward_z + plane_z;
        let eye_cells = cam.y / CELL;
        let ceil_cells = (WALL_H - cam.y) / CELL;
        let surface = textures.surface();
        let (tw, th) = (surface.width(), surface.height());

        for y in 0..h {
            let p = y - horizon;
            if p == 0 {
                continue;
            }
            // filas bajo el horizonte proyectan el piso; sobre el, el techo
            let row_dist = if p > 0 {
                eye_cells * half_h / p as f32
            } else {
                ceil_cells * half_h / (-p) as f32
            };
            let step_x = row_dist * (ray1_x - ray0_x) / w as f32;
            let step_z = row_dist * (ray1_z - ray0_z) / w as f32;
            let mut fx = pos_x + row_dist * ray0_x;
            let mut fz = pos_z + row_dist * ray0_z;

            let world_dist = row_dist * CELL;
            let k = distance_shade(world_dist);
            let (kr, kg, kb) = (k * tr, k * tg, k * tb);

            for x in 0..w {
                let u = fx - fx.floor();
                let v = fz - fz.floor();
                let texel = surface.sample((u * tw as f32) as u32, (v * th as f32) as u32);
                self.frame
                    .set_pixel(x as u32, y as u32, scale_color(texel, kr, kg, kb));
                fx += step_x;
                fz += step_z;
            }
        }

        // 2) paredes por DDA, un rayo cada RAY_STEP columnas
        for sx in (0..w).step_by(RAY_STEP) {
            let camera_x = (2.0 * sx as f32 / w as f32) - 1.0;
            let ray_dir_x = forward_x + plane_x * camera_x;
            let ray_dir_z = forward_z + plane_z * camera_x;

            let mut map_x = pos_x.floor() as i32;
            let mut map_z = pos_z.floor() as i32;

            let delta_dist_x = (1.0 / ray_dir_x).abs();
            let delta_dist_z = (1.0 / ray_dir_z).abs();

            let (step_x, mut side_dist_x) = if ray_dir_x < 0.0 {
                (-1, (pos_x - map_x as f32) * delta_dist_x)
            } else {
                (1, (map_x as f32 + 1.0 - pos_x) * delta_dist_x)
            };
            let (step_z, mut side_dist_z) = if ray_dir_z < 0.0 {
                (-1, (pos_z - map_z as f32) * delta_dist_z)
            } else {
                (1, (map_z as f32 + 1.0 - pos_z) * delta_dist_z)
            };

            let mut hit = false;
            let mut side = 0;
            let mut safety = 0;
            while !hit && safety < DDA_MAX_STEPS {
                safety += 1;
                if side_dist_x < side_dist_z {
                    side_dist_x += delta_dist_x;
                    map_x += step_x;
                    side = 0;
                } else {
                    side_dist_z += delta_dist_z;
                    map_z += step_z;
                    side = 1;
                }
                // fuera del grid cuenta como pared, el rayo no escapa
                if floor.maze.is_wall(map_x, map_z) {
                    hit = true;
                }
            }
            if !hit {
                continue;
            }

            // distancia perpendicular (no euclidiana) para evitar ojo de pez
            let perp_dist = if side == 0 {
                (map_x as f32 - pos_x + (1 - step_x) as f32 * 0.5) / ray_dir_x
            } else {
                (map_z as f32 - pos_z + (1 - step_z) as f32 * 0.5) / ray_dir_z
            };
            let world_dist = (perp_dist * CELL).max(1.0);

            let line_h = (WALL_H * proj_scale) / world_dist;
            let top_f = half_h - line_h * 0.5 + y_offset;
            let bottom_f = half_h + line_h * 0.5 + y_offset;

            // coordenada horizontal de textura segun el punto de impacto,
            // espejada en los lados positivos para mantener la orientacion
            let variant = wall_variant_for(map_x, map_z, nav.level.seed);
            let wall_tex = textures.wall(variant);
            let (ww, wh) = (wall_tex.width(), wall_tex.height());
            let hit_frac = if side == 0 {
                let v = pos_z + perp_dist * ray_dir_z;
                v - v.floor()
            } else {
                let v = pos_x + perp_dist * ray_dir_x;
                v - v.floor()
            };
            let mut tex_x = (hit_frac * ww as f32) as i32;
            if (side == 0 && ray_dir_x > 0.0) || (side == 1 && ray_dir_z < 0.0) {
                tex_x = ww as i32 - 1 - tex_x;
            }
            let tex_x = tex_x.clamp(0, ww as i32 - 1) as u32;

            let k = distance_shade(world_dist);
            let side_mul = if side == 1 { 0.85 } else { 1.0 };
            let (kr, kg, kb) = (k * side_mul * tr, k * side_mul * tg, k * side_mul * tb);

            let fill_end = (sx + RAY_STEP as i32).min(w);
            for fill_x in sx..fill_end {
                self.depth[fill_x as usize] = world_dist;
            }

            let y_start = top_f.max(0.0) as i32;
            let y_end = (bottom_f as i32).min(h);
            for y in y_start..y_end {
                let v = (y as f32 - top_f) / line_h;
                let tex_y = ((v * wh as f32) as u32).min(wh - 1);
                let texel = wall_tex.sample(tex_x, tex_y);
                if texel.a == 0 {
                    continue;
                }
                let color = scale_color(texel, kr, kg, kb);
                for fill_x in sx..fill_end {
                    self.frame.set_pixel(fill_x as u32, y as u32, color);
                }
            }
        }

        // 3) marcador sobre el plano del piso: meta en el ultimo piso,
        //    escalera en los demas; probado contra el z-buffer por columna
        if let Some((mx, mz)) = nav.marker_cell() {
            let color = if nav.on_top_floor() {
                GOAL_COLOR
            } else {
                STAIR_COLOR
            };
            let y_from = (horizon + 1).max(0);
            for y in y_from..h {
                let p = y - horizon;
                let row_dist = eye_cells * half_h / p as f32;
                let world_dist = row_dist * CELL;
                let step_x = row_dist * (ray1_x - ray0_x) / w as f32;
                let step_z = row_dist * (ray1_z - ray0_z) / w as f32;
                let mut fx = pos_x + row_dist * ray0_x;
                let mut fz = pos_z + row_dist * ray0_z;
                for x in 0..w {
                    if world_dist < self.depth[x as usize]
                        && fx.floor() as i32 == mx
                        && fz.floor() as i32 == mz
                    {
                        self.frame.set_pixel(x as u32, y as u32, color);
                    }
                    fx += step_x;
                    fz += step_z;
                }
            }
        }

        // 4) minimapa (overlay en pixeles de pantalla, norte arriba)
        if nav.minimap {
            self.draw_minimap(nav, pos_x, pos_z, forward_x, forward_z);
        }
    }

    fn draw_minimap(&mut self, nav: &Navigator, pos_x: f32, pos_z: f32, fwd_x: f32, fwd_z: f32) {
        let maze = &nav.active_floor().maze;
        let n = maze.size() as i32;
        let scale = MINIMAP_SCALE;
        let pad = MINIMAP_PAD;

        self.frame
            .draw_rect(pad, pad, n * scale, n * scale, Color::new(240, 240, 240, 255));

        for mz in 0..n {
            for mx in 0..n {
                if maze.is_wall(mx, mz) {
                    let draw_y = pad + (n - 1 - mz) * scale;
                    self.frame.draw_rect(
                        pad + mx * scale,
                        draw_y,
                        scale,
                        scale,
                        Color::new(20, 20, 20, 255),
                    );
                }
            }
        }

        // jugador y direccion de vista
        let player = Color::new(200, 40, 40, 255);
        let px = pad + (pos_x * scale as f32 - scale as f32 * 0.25) as i32;
        let py = pad + ((n as f32 - pos_z) * scale as f32 - scale as f32 * 0.25) as i32;
        self.frame.draw_rect(px, py, scale / 2, scale / 2, player);

        let dir_len = scale as f32 * 0.6;
        let dx = pad + (pos_x * scale as f32 + fwd_x * dir_len - scale as f32 * 0.15) as i32;
        let dy = pad + ((n as f32 - pos_z) * scale as f32 - fwd_z * dir_len - scale as f32 * 0.15) as i32;
        self.frame.draw_rect(dx, dy, scale / 3, scale / 3, player);

        if let Some((mx, mz)) = nav.marker_cell() {
            let color = if nav.on_top_floor() {
                GOAL_COLOR
            } else {
                STAIR_COLOR
            };
            let gx = pad + ((mx as f32 + 0.5) * scale as f32 - scale as f32 * 0.25) as i32;
            let gy = pad + ((n as f32 - (mz as f32 + 0.5)) * scale as f32 - scale as f32 * 0.25) as i32;
            self.frame.draw_rect(gx, gy, scale / 2, scale / 2, color);
        }
    }
}
