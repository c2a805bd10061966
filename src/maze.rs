use crate::rng::Lcg;

/// Laberinto cuadrado de lado impar. Cada celda es pared (1) o libre (0).
/// Fuera de rango siempre cuenta como pared: es la red de seguridad de
/// colisiones, raycasting y busquedas.
pub struct Maze {
    size: usize,
    cells: Vec<u8>,
}

impl Maze {
    fn solid(size: usize) -> Self {
        Self {
            size,
            cells: vec![1; size * size],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_wall(&self, x: i32, z: i32) -> bool {
        if x < 0 || z < 0 || x >= self.size as i32 || z >= self.size as i32 {
            return true;
        }
        self.cells[z as usize * self.size + x as usize] != 0
    }

    #[inline]
    pub fn set_open(&mut self, x: i32, z: i32) {
        if x >= 0 && z >= 0 && x < self.size as i32 && z < self.size as i32 {
            self.cells[z as usize * self.size + x as usize] = 0;
        }
    }

    #[cfg(test)]
    pub fn set_wall(&mut self, x: i32, z: i32) {
        if x >= 0 && z >= 0 && x < self.size as i32 && z < self.size as i32 {
            self.cells[z as usize * self.size + x as usize] = 1;
        }
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 0).count()
    }

    /// Genera un laberinto "perfecto" (arbol: sin ciclos, todo conectado)
    /// con backtracking desde (1,1). Se avanza de dos en dos para dejar una
    /// pared entre pasillos; el borde queda siempre cerrado.
    ///
    /// La recursion clasica se reemplaza por una pila explicita: cada marco
    /// guarda su barajado de direcciones y por cual va, asi el consumo del
    /// generador queda identico al de la version recursiva.
    pub fn generate(size: i32, seed: i32) -> Maze {
        let size = if size % 2 == 0 { size + 1 } else { size };
        let size = size.max(3);
        let mut maze = Maze::solid(size as usize);
        let mut rng = Lcg::new(seed);

        struct Frame {
            x: i32,
            z: i32,
            dirs: [i32; 8],
            next: usize,
        }

        // barajado parcial Fisher-Yates sobre los 4 pares (dx,dz); el indice
        // pasa por next_index, que acota el caso en que el valor redondea a 1.0
        fn shuffled_dirs(rng: &mut Lcg) -> [i32; 8] {
            let mut dirs: [i32; 8] = [2, 0, -2, 0, 0, 2, 0, -2];
            let mut i = 6usize;
            loop {
                let j = rng.next_index(i / 2 + 1) * 2;
                dirs.swap(i, j);
                dirs.swap(i + 1, j + 1);
                if i == 2 {
                    break;
                }
                i -= 2;
            }
            dirs
        }

        maze.set_open(1, 1);
        let mut stack = vec![Frame {
            x: 1,
            z: 1,
            dirs: shuffled_dirs(&mut rng),
            next: 0,
        }];

        loop {
            let Some(depth) = stack.len().checked_sub(1) else {
                break;
            };
            if stack[depth].next >= 8 {
                stack.pop();
                continue;
            }
            let (cx, cz, dx, dz) = {
                let top = &mut stack[depth];
                let dx = top.dirs[top.next];
                let dz = top.dirs[top.next + 1];
                top.next += 2;
                (top.x, top.z, dx, dz)
            };

            let nx = cx + dx;
            let nz = cz + dz;
            if nx <= 0 || nz <= 0 || nx >= size - 1 || nz >= size - 1 {
                continue;
            }
            if maze.is_wall(nx, nz) {
                // abrir el punto medio y entrar a la celda vecina
                let mx = cx + dx / 2;
                let mz = cz + dz / 2;
                maze.set_open(mx, mz);
                maze.set_open(nx, nz);
                let dirs = shuffled_dirs(&mut rng);
                stack.push(Frame {
                    x: nx,
                    z: nz,
                    dirs,
                    next: 0,
                });
            }
        }

        maze
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_cells(m: &Maze) -> Vec<(i32, i32)> {
        let n = m.size() as i32;
        let mut out = Vec::new();
        for z in 0..n {
            for x in 0..n {
                if !m.is_wall(x, z) {
                    out.push((x, z));
                }
            }
        }
        out
    }

    /// aristas del subgrafo de celdas libres (4-conexo), contadas una vez
    fn open_edges(m: &Maze) -> usize {
        let n = m.size() as i32;
        let mut edges = 0;
        for z in 0..n {
            for x in 0..n {
                if m.is_wall(x, z) {
                    continue;
                }
                if !m.is_wall(x + 1, z) {
                    edges += 1;
                }
                if !m.is_wall(x, z + 1) {
                    edges += 1;
                }
            }
        }
        edges
    }

    fn reachable_from(m: &Maze, start: (i32, i32)) -> usize {
        let n = m.size() as i32;
        let mut seen = vec![false; (n * n) as usize];
        let mut stack = vec![start];
        seen[(start.1 * n + start.0) as usize] = true;
        let mut count = 0;
        while let Some((x, z)) = stack.pop() {
            count += 1;
            for (dx, dz) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let (nx, nz) = (x + dx, z + dz);
                if nx >= 0 && nz >= 0 && nx < n && nz < n {
                    let i = (nz * n + nx) as usize;
                    if !seen[i] && !m.is_wall(nx, nz) {
                        seen[i] = true;
                        stack.push((nx, nz));
                    }
                }
            }
        }
        count
    }

    #[test]
    fn generation_is_deterministic() {
        for &size in &[5, 9, 15, 25] {
            for &seed in &[1, 42, 987654] {
                let a = Maze::generate(size, seed);
                let b = Maze::generate(size, seed);
                let n = a.size() as i32;
                for z in 0..n {
                    for x in 0..n {
                        assert_eq!(a.is_wall(x, z), b.is_wall(x, z));
                    }
                }
            }
        }
    }

    #[test]
    fn border_is_wall_and_entry_is_open() {
        let m = Maze::generate(15, 77);
        let n = m.size() as i32;
        for i in 0..n {
            assert!(m.is_wall(i, 0));
            assert!(m.is_wall(i, n - 1));
            assert!(m.is_wall(0, i));
            assert!(m.is_wall(n - 1, i));
        }
        assert!(!m.is_wall(1, 1));
    }

    #[test]
    fn even_size_is_bumped_to_odd() {
        let m = Maze::generate(6, 3);
        assert_eq!(m.size(), 7);
    }

    #[test]
    fn open_subgraph_is_a_spanning_tree() {
        // conectado y sin ciclos: aristas = celdas libres - 1
        for &seed in &[1, 42, 555, 90210] {
            let m = Maze::generate(13, seed);
            let open = open_cells(&m);
            assert!(!open.is_empty());
            assert_eq!(open_edges(&m), open.len() - 1);
            assert_eq!(reachable_from(&m, (1, 1)), open.len());
        }
    }

    #[test]
    fn five_by_five_from_seed_42() {
        // en 5x5 los nodos tallados son (1,1),(3,1),(1,3),(3,3); un arbol
        // de 4 nodos usa 3 conectores -> 7 celdas libres en total
        let m = Maze::generate(5, 42);
        let open = open_cells(&m);
        assert_eq!(open.len(), 7);
        assert_eq!(m.open_count(), open.len());
        assert_eq!(open_edges(&m), open.len() - 1);
        assert_eq!(reachable_from(&m, (1, 1)), open.len());
    }

    #[test]
    fn generation_survives_a_draw_that_rounds_to_one() {
        // el primer valor del generador con esta semilla redondea a 1.0 en
        // f32; el barajado no debe indexar fuera del arreglo de direcciones
        let m = Maze::generate(5, 247665088);
        let open = open_cells(&m);
        assert!(!open.is_empty());
        assert_eq!(reachable_from(&m, (1, 1)), open.len());
    }

    #[test]
    fn out_of_range_is_wall() {
        let m = Maze::generate(5, 1);
        assert!(m.is_wall(-1, 2));
        assert!(m.is_wall(2, -1));
        assert!(m.is_wall(99, 2));
        assert!(m.is_wall(2, 99));
    }
}
