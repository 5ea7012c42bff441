use rayon::prelude::*;

/// Returns a 256 entry byte frequency count of the input data. Uses parallelism when the data
/// set is over 64k.
pub fn freqs(data: &[u8]) -> Vec<u64> {
    if data.len() > 64_000 {
        // 16k is pretty much the sweet spot for chunk size.
        data.par_chunks(16_000)
            .fold(
                || vec![0_u64; 256],
                |mut freqs, chunk| {
                    chunk.iter().for_each(|&el| freqs[el as usize] += 1);
                    freqs
                },
            )
            .reduce(
                || vec![0_u64; 256],
                |s, f| s.iter().zip(&f).map(|(a, b)| a + b).collect::<Vec<u64>>(),
            )
    } else {
        let mut freqs = vec![0_u64; 256];
        data.iter().for_each(|&el| freqs[el as usize] += 1);
        freqs
    }
}

#[cfg(test)]
mod test {
    use super::freqs;

    #[test]
    fn small_count_test() {
        let f = freqs("hello".as_bytes());
        assert_eq!(f[b'l' as usize], 2);
        assert_eq!(f[b'h' as usize], 1);
        assert_eq!(f.iter().sum::<u64>(), 5);
    }

    #[test]
    fn parallel_matches_sequential_test() {
        let data: Vec<u8> = (0..200_000_u32).map(|i| (i * 7 % 251) as u8).collect();
        let mut expected = vec![0_u64; 256];
        data.iter().for_each(|&b| expected[b as usize] += 1);
        assert_eq!(freqs(&data), expected);
    }
}
