/// N50 of a length collection: the length at which the descending cumulative
/// sum first reaches half of the total. Returns 0 for an empty collection.
pub fn n50(lengths: &[usize]) -> usize {
    if lengths.is_empty() {
        return 0;
    }
    let mut sorted = lengths.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let total: u64 = sorted.iter().map(|&l| l as u64).sum();
    let mut acc: u64 = 0;
    for &len in &sorted {
        acc += len as u64;
        // acc >= total / 2 without the float
        if acc * 2 >= total {
            return len;
        }
    }
    sorted[sorted.len() - 1]
}
