//! Build script for Scrunge
//!
//! - Windows: embeds the application manifest for long path support (>260 chars)
//!
//! Media libraries nest deeply, and Windows limits paths to 260 characters
//! (MAX_PATH) unless the executable declares `longPathAware` in its
//! manifest (`scrunge.manifest`). On other platforms this script does
//! nothing.

fn main() {
    #[cfg(windows)]
    {
        // The .rc file wraps the XML manifest as an RT_MANIFEST resource
        embed_resource::compile("scrunge.rc", embed_resource::NONE);

        println!("cargo:rerun-if-changed=scrunge.rc");
        println!("cargo:rerun-if-changed=scrunge.manifest");
    }
}
