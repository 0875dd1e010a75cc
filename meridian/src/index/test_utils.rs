use meridian_types::cartesian::Envelope;

/// Deterministic sequence of small envelopes scattered over `[0, 1000] x [0, 1000]`.
pub(crate) fn pseudo_random_envelopes(count: usize, max_size: f64) -> Vec<Envelope> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    (0..count)
        .map(|_| {
            let x = next() * 1000.0;
            let y = next() * 1000.0;
            let width = next() * max_size;
            let height = next() * max_size;
            Envelope::new(x, y, x + width, y + height)
        })
        .collect()
}

pub(crate) fn brute_force(envelopes: &[Envelope], query: &Envelope) -> Vec<usize> {
    envelopes
        .iter()
        .enumerate()
        .filter(|(_, envelope)| envelope.intersects(query))
        .map(|(index, _)| index)
        .collect()
}

pub(crate) fn sorted(items: Vec<&usize>) -> Vec<usize> {
    let mut items: Vec<usize> = items.into_iter().copied().collect();
    items.sort();
    items
}
