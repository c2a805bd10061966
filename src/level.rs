use raylib::prelude::*;
use tracing::info;

use crate::locate;
use crate::maze::Maze;
use crate::rng::Lcg;

/// Lado de cada celda en unidades de mundo (coherente con colisiones).
pub const CELL: f32 = 80.0;
/// Altura de las paredes.
pub const WALL_H: f32 = 80.0;

/// Lados posibles de un piso, impares y ascendentes.
const FLOOR_SIZES: [i32; 10] = [5, 7, 9, 11, 13, 15, 17, 19, 21, 25];

/// Paleta fija de 8 tintes de pared; la semilla del nivel elige uno.
const PALETTE: [(u8, u8, u8); 8] = [
    (220, 220, 220),
    (200, 140, 120),
    (140, 190, 210),
    (170, 200, 140),
    (210, 180, 120),
    (150, 150, 210),
    (190, 160, 200),
    (200, 200, 160),
];

/// Un piso: su laberinto mas el desplazamiento que lo centra en el origen.
pub struct Floor {
    pub maze: Maze,
    pub start_x: f32,
    pub start_z: f32,
}

impl Floor {
    /// Celda del grid que contiene la coordenada de mundo (wx, wz).
    #[inline]
    pub fn cell_of(&self, wx: f32, wz: f32) -> (i32, i32) {
        (
            ((wx - self.start_x) / CELL).floor() as i32,
            ((wz - self.start_z) / CELL).floor() as i32,
        )
    }

    /// Centro en mundo de la celda (x, z).
    #[inline]
    pub fn cell_center(&self, x: i32, z: i32) -> (f32, f32) {
        (
            self.start_x + (x as f32 + 0.5) * CELL,
            self.start_z + (z as f32 + 0.5) * CELL,
        )
    }
}

/// Nivel completo: 3 o 4 pisos, la celda de escalera entre pisos contiguos,
/// el tinte de pared y la semilla que lo genero todo.
pub struct Level {
    pub floors: Vec<Floor>,
    /// stairs[i] conecta el piso i con el i+1; la celda esta libre en ambos.
    pub stairs: Vec<(i32, i32)>,
    pub wall_color: Color,
    pub seed: i32,
    pub index: i32,
}

impl Level {
    pub fn build(level_seed: i32, level_index: i32) -> Level {
        let floor_count = 3 + (level_index.rem_euclid(2)) as usize;
        let mut rng = Lcg::new(level_seed);

        let mut floors = Vec::with_capacity(floor_count);
        for i in 0..floor_count {
            let size = FLOOR_SIZES[rng.next_index(FLOOR_SIZES.len())];
            let maze_seed = level_seed + (i as i32) * 1013;
            let maze = Maze::generate(size, maze_seed);
            let half = maze.size() as f32 * CELL * 0.5;
            floors.push(Floor {
                maze,
                start_x: -half,
                start_z: -half,
            });
        }

        let mut stairs = Vec::with_capacity(floor_count - 1);
        for i in 0..floor_count - 1 {
            let (sx, sz) = find_corner_open_cell_pair(
                &floors[i].maze,
                &floors[i + 1].maze,
                i as i32,
                level_seed,
            );
            // unico punto donde dos arboles independientes se unen
            floors[i].maze.set_open(sx, sz);
            floors[i + 1].maze.set_open(sx, sz);
            stairs.push((sx, sz));
        }

        let wall_color = pick_wall_color(level_seed);

        info!(
            seed = level_seed,
            index = level_index,
            floors = floor_count,
            sizes = ?floors.iter().map(|f| f.maze.size()).collect::<Vec<_>>(),
            "nivel construido"
        );

        Level {
            floors,
            stairs,
            wall_color,
            seed: level_seed,
            index: level_index,
        }
    }

    #[inline]
    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }
}

fn pick_wall_color(seed: i32) -> Color {
    let s = seed;
    let idx = ((s ^ (s >> 8) ^ (s >> 16)) & 7) as usize;
    let (r, g, b) = PALETTE[idx];
    Color::new(r, g, b, 255)
}

/// Busca la celda de escalera entre dos pisos contiguos: en un cuadrante de
/// esquina (rotado por el indice del par y la semilla) se recorre una region
/// de 1/4 del lado menor y gana la celda mas lejana al centro (distancia al
/// cuadrado) que este libre en AMBOS grids; libre en uno solo es el plan B.
/// Si la region no aporta nada, cae al escaneo por hash sobre el grid A.
/// El desempate es el orden de barrido (filas, luego columnas).
pub fn find_corner_open_cell_pair(a: &Maze, b: &Maze, pair_index: i32, seed: i32) -> (i32, i32) {
    let ext = a.size().min(b.size()) as i32;
    let center = ext / 2;
    let region = (ext / 4).max(2);
    let quad = (pair_index + (seed & 3)).rem_euclid(4);

    // anclas por cuadrante, siempre dentro del borde
    let (x0, z0) = match quad {
        0 => (1, 1),
        1 => ((ext - 1 - region).max(1), 1),
        2 => (1, (ext - 1 - region).max(1)),
        _ => ((ext - 1 - region).max(1), (ext - 1 - region).max(1)),
    };

    let mut best_both: Option<(i32, i32, i32)> = None;
    let mut best_single: Option<(i32, i32, i32)> = None;

    for z in z0..(z0 + region).min(ext - 1) {
        for x in x0..(x0 + region).min(ext - 1) {
            let d2 = (x - center) * (x - center) + (z - center) * (z - center);
            let open_a = !a.is_wall(x, z);
            let open_b = !b.is_wall(x, z);
            if open_a && open_b {
                if best_both.map(|(_, _, bd)| d2 > bd).unwrap_or(true) {
                    best_both = Some((x, z, d2));
                }
            } else if open_a || open_b {
                if best_single.map(|(_, _, bd)| d2 > bd).unwrap_or(true) {
                    best_single = Some((x, z, d2));
                }
            }
        }
    }

    if let Some((x, z, _)) = best_both {
        return (x, z);
    }
    if let Some((x, z, _)) = best_single {
        return (x, z);
    }
    locate::find_open(a, seed + pair_index * 7)
}
