use anyhow::{anyhow, Result};

use flatrec::restaurant::Restaurant;

use super::util::require_admin;

pub fn exec(r: &Restaurant, password: String, new_password: String) -> Result<()> {
    require_admin(r, &password)?;
    if !r.admin.change_password(&new_password)? {
        return Err(anyhow!("password not changed (empty)"));
    }
    println!("Admin password updated.");
    Ok(())
}
