use crate::maze::Maze;

/// Busca una celda libre cerca de (cx, cz) expandiendo anillos cuadrados
/// (distancia Chebyshev 1, 2, 3, ...). Dentro de cada anillo se escanea por
/// filas de arriba a abajo y por columnas de izquierda a derecha, asi el
/// desempate es estable. Si el grid es degenerado (nada libre alrededor),
/// cae al escaneo por hash; nunca devuelve fuera de rango.
pub fn find_near(maze: &Maze, cx: i32, cz: i32) -> (i32, i32) {
    if !maze.is_wall(cx, cz) {
        return (cx, cz);
    }

    let n = maze.size() as i32;
    let max_r = n.max(1);
    for r in 1..max_r {
        for dz in -r..=r {
            for dx in -r..=r {
                // solo el borde del anillo
                if dx.abs() != r && dz.abs() != r {
                    continue;
                }
                let mx = cx + dx;
                let mz = cz + dz;
                if mx < 0 || mz < 0 || mx >= n || mz >= n {
                    continue;
                }
                if !maze.is_wall(mx, mz) {
                    return (mx, mz);
                }
            }
        }
    }

    // grid patologico: semilla derivada del propio centro para ser estable
    find_open(maze, cx * 73 + cz * 151 + 1)
}

/// Escaneo de celda libre por hash: arranca en una coordenada derivada de la
/// semilla y avanza con pasos fijos (+3 columnas, +5 filas) modulo el lado.
/// Acotado por el area del grid; el ultimo recurso es (1,1).
pub fn find_open(maze: &Maze, seed: i32) -> (i32, i32) {
    let n = maze.size() as i32;
    if n <= 0 {
        return (1, 1);
    }
    let s = seed.unsigned_abs() as i32;
    let mut x = s % n;
    let mut z = (s / n.max(1)) % n;
    for _ in 0..(n * n) {
        if !maze.is_wall(x, z) {
            return (x, z);
        }
        x = (x + 3) % n;
        z = (z + 5) % n;
    }
    (1, 1)
}
