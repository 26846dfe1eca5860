#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

pub const APPLICATION_RB: &str = "require_relative 'boot'

require 'rails/all'

module Shop
  class Application < Rails::Application
    config.load_defaults 6.0
  end
end
";

pub const DATABASE_YML: &str = "default: &default
  adapter: postgresql
  encoding: unicode

development:
  <<: *default
  database: shop_development

production:
  <<: *default
  database: shop_production
  username: shop
  password: <%= ENV['SHOP_DATABASE_PASSWORD'] %>
";

/// Minimal stand-in for a freshly generated Rails app.
pub fn init_rails_app(dir: &Path) {
    fs::create_dir_all(dir.join("config")).unwrap();
    fs::write(dir.join("Gemfile"), "source 'https://rubygems.org'\n\ngem 'rails'\n").unwrap();
    fs::write(dir.join("config").join("application.rb"), APPLICATION_RB).unwrap();
    fs::write(dir.join("config").join("database.yml"), DATABASE_YML).unwrap();
}

#[cfg(unix)]
pub fn write_executable(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    fs::metadata(path).unwrap().permissions().mode() & 0o111 != 0
}

pub fn prepend_path(stub_bin: &Path) -> String {
    let old = std::env::var("PATH").unwrap_or_default();
    format!("{}:{}", stub_bin.display(), old)
}
