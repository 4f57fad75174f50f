//! Shared format constants (store header, slots, file names, field widths).

// -------- Store header --------
pub const STORE_MAGIC: &[u8; 8] = b"FLATREC1";
pub const STORE_VERSION: u32 = 1;

// Header layout (LE):
// [magic8][version u32][tag 4][slot_size u32][header_crc u32][last_id u64]
//
// Total header size = 8 + 4 + 4 + 4 + 4 + 8 = 32 bytes.
pub const STORE_HDR_SIZE: usize = 32;

// Offsets inside the header
pub const HDR_OFF_VERSION: usize = 8;
pub const HDR_OFF_TAG: usize = 12;
pub const HDR_OFF_SLOT_SIZE: usize = 16;
pub const HDR_OFF_CRC: usize = 20;
pub const HDR_OFF_LAST_ID: usize = 24;

// -------- Slots --------
// Slot = [payload T::SIZE][crc32 u32 over payload]
pub const SLOT_TRAILER_LEN: usize = 4;

// Suffix of the side file used by rewrite/rebuild before the rename.
pub const TMP_SUFFIX: &str = "tmp";

// -------- Record tags --------
pub const TAG_ACCOUNT: &[u8; 4] = b"ACCT";
pub const TAG_MENU_ITEM: &[u8; 4] = b"MENU";
pub const TAG_ORDER: &[u8; 4] = b"ORDR";
pub const TAG_ADMIN: &[u8; 4] = b"ADMN";

// -------- File names (inside the data dir) --------
pub const ACCOUNTS_FILE: &str = "accounts.dat";
pub const MENU_FILE: &str = "menu.dat";
pub const ORDERS_FILE: &str = "orders.dat";
pub const ADMIN_FILE: &str = "admin.dat";

// -------- Field widths (bytes) --------
pub const ACCOUNT_NAME_LEN: usize = 100;
pub const MENU_NAME_LEN: usize = 50;
pub const MENU_CATEGORY_LEN: usize = 30;
pub const CUSTOMER_NAME_LEN: usize = 50;
pub const PASSWORD_LEN: usize = 50;

/// Fixed capacity of the item list stored inside one order record.
pub const MAX_ITEMS_PER_ORDER: usize = 50;

// -------- Business defaults --------
/// 5% in basis points.
pub const DEFAULT_TAX_BPS: u32 = 500;
pub const ADMIN_DEFAULT_PASSWORD: &str = "admin123";
