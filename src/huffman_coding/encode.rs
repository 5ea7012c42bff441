use std::fmt::Debug;
use std::hash::Hash;

use log::debug;

use super::code_table::CodeTable;
use crate::bitstream::{BitPacker, Bitstream};
use crate::error::{HuffmanError, Result};

/// Encode a symbol sequence with a code table. The codes are concatenated in input order and
/// the returned bitstream's `len()` is the exact encoded bit count.
///
/// Fails with `UnknownSymbol` for the first symbol that has no code, which means the table was
/// built from a different alphabet than the input.
pub fn encode<'a, S, I>(codes: &CodeTable<S>, symbols: I) -> Result<Bitstream>
where
    S: Eq + Hash + Clone + Debug + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let symbols = symbols.into_iter();
    let mut bw = BitPacker::new(symbols.size_hint().0);

    for (position, symbol) in symbols.enumerate() {
        match codes.get(symbol) {
            Some(code) => bw.append(code),
            None => {
                return Err(HuffmanError::UnknownSymbol {
                    symbol: format!("{:?}", symbol),
                    position,
                })
            }
        }
    }

    debug!("Encoded {} bits.", bw.bit_count());
    Ok(bw.finish())
}
