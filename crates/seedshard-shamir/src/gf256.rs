//! Galois Field GF(256) arithmetic for Shamir's Secret Sharing
//!
//! Uses the irreducible polynomial x^8 + x^4 + x^3 + x + 1 (0x11B) with
//! generator 3. This is the field used by AES and SLIP-39.

/// Build the exp/log tables at compile time.
const fn build_tables() -> ([u8; 255], [u8; 256]) {
    let mut exp = [0u8; 255];
    let mut log = [0u8; 256];
    let mut poly: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = poly as u8;
        log[poly as usize] = i as u8;
        // poly *= 3
        poly = (poly << 1) ^ poly;
        if poly & 0x100 != 0 {
            poly ^= 0x11B;
        }
        i += 1;
    }
    (exp, log)
}

const TABLES: ([u8; 255], [u8; 256]) = build_tables();

/// exp[i] = 3^i
static EXP: [u8; 255] = TABLES.0;

/// log[x] = discrete log of x base 3 (log[0] is unused)
static LOG: [u8; 256] = TABLES.1;

/// Add two elements in GF(256) (XOR)
#[inline]
pub fn gf_add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Subtract two elements in GF(256) (same as add in characteristic 2)
#[inline]
pub fn gf_sub(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Multiply two elements in GF(256)
#[inline]
pub fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_a = LOG[a as usize] as usize;
    let log_b = LOG[b as usize] as usize;
    EXP[(log_a + log_b) % 255]
}

/// Divide two elements in GF(256)
#[inline]
pub fn gf_div(a: u8, b: u8) -> u8 {
    assert!(b != 0, "Division by zero in GF(256)");
    if a == 0 {
        return 0;
    }
    let log_a = LOG[a as usize] as usize;
    let log_b = LOG[b as usize] as usize;
    EXP[(log_a + 255 - log_b) % 255]
}

/// Compute the inverse of an element in GF(256)
#[inline]
pub fn gf_inv(a: u8) -> u8 {
    assert!(a != 0, "Inverse of zero in GF(256)");
    EXP[(255 - LOG[a as usize] as usize) % 255]
}

/// Lagrange basis values `L_i(x)` for the points `xs`.
///
/// `xs` must be pairwise distinct. The value of the interpolating polynomial
/// at `x` is then `sum(y_i * L_i(x))`, so one basis serves every byte
/// position of a multi-byte share.
pub fn lagrange_basis(xs: &[u8], x: u8) -> Vec<u8> {
    xs.iter()
        .enumerate()
        .map(|(i, &xi)| {
            let mut numerator = 1u8;
            let mut denominator = 1u8;
            for (j, &xj) in xs.iter().enumerate() {
                if i != j {
                    numerator = gf_mul(numerator, gf_sub(x, xj));
                    denominator = gf_mul(denominator, gf_sub(xi, xj));
                }
            }
            gf_div(numerator, denominator)
        })
        .collect()
}

/// Evaluate at `x` the lowest-degree polynomial through `points`.
/// `points: &[(x, y)]` with pairwise distinct x.
pub fn lagrange_interpolate(points: &[(u8, u8)], x: u8) -> u8 {
    let xs: Vec<u8> = points.iter().map(|&(xi, _)| xi).collect();
    lagrange_basis(&xs, x)
        .into_iter()
        .zip(points)
        .fold(0u8, |acc, (li, &(_, yi))| gf_add(acc, gf_mul(yi, li)))
}
