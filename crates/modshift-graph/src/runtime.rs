//! Reference loader for `System.register` output.

/// Minimal `System` implementation for modules produced by
/// [`SystemFormatter`](crate::SystemFormatter).
///
/// Registrations are keyed by registration name and a second registration
/// under a taken name is ignored. A module is marked executed before its
/// dependencies run, so a cycle reaching back to it receives its (not yet
/// populated) export object instead of recursing. Names that were never
/// registered fall back to `require` when the host provides it.
pub const SYSTEM_RUNTIME: &str = r#"(function (global) {
  "use strict";

  if (global.System && global.System.__modshift__) {
    return;
  }

  var registry = {};

  function register(name, deps, declare) {
    if (Object.prototype.hasOwnProperty.call(registry, name)) {
      return;
    }
    registry[name] = { deps: deps, declare: declare, entry: null, executed: false };
  }

  function link(name) {
    var record = registry[name];
    if (!record.entry) {
      record.entry = record.declare();
    }
    return record.entry;
  }

  function load(name) {
    if (!Object.prototype.hasOwnProperty.call(registry, name)) {
      if (typeof require === "function") {
        return require(name);
      }
      throw new Error("Module '" + name + "' is not registered");
    }

    var record = registry[name];
    var entry = link(name);
    if (!record.executed) {
      record.executed = true;
      var handles = record.deps.map(load);
      entry.fn.apply(undefined, handles);
    }
    return entry.exports;
  }

  global.System = {
    __modshift__: true,
    register: register,
    import: load,
    get: function (name) {
      var record = registry[name];
      return record && record.executed ? record.entry.exports : undefined;
    },
    has: function (name) {
      return Object.prototype.hasOwnProperty.call(registry, name);
    }
  };
})(typeof globalThis !== "undefined" ? globalThis : this);
"#;
