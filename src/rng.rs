/// Generador congruencial (Lehmer / MINSTD): modulo 2^31-1, multiplicador 48271.
/// Toda la generación del juego pasa por aquí para que una misma semilla
/// reproduzca exactamente el mismo mundo. El orden de consumo importa.
pub struct Lcg {
    state: i64,
}

impl Lcg {
    pub fn new(seed: i32) -> Self {
        let mut s = (seed as i64) % 2147483647;
        if s <= 0 {
            s += 2147483646;
        }
        Self { state: s }
    }

    /// Siguiente valor en [0, 1]. Ojo: cuando el estado queda pegado al
    /// modulo, el redondeo de f32 puede devolver exactamente 1.0; todo
    /// indice derivado de este valor debe pasar por `next_index`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.state = (self.state * 48271) % 2147483647;
        ((self.state - 1) as f32) / 2147483646.0
    }

    /// Entero uniforme en [0, n).
    #[inline]
    pub fn next_index(&mut self, n: usize) -> usize {
        let i = (self.next_f32() * n as f32) as usize;
        i.min(n.saturating_sub(1))
    }
}
