//! Shared fixtures for compiler tests.

use indoc::indoc;
use playprint_core::SymbolTable;

use crate::symbols::scan;
use crate::workprint::{AttributeClassResolver, Workprint};

/// A small castle: one texture, one lighting set, and a hall scene holding
/// a squad with a single knight.
pub const CASTLE: &str = indoc! {r#"
    {
      "kind": "root",
      "name": "castle",
      "children": [
        {
          "kind": "media",
          "name": "tex1",
          "attributes": { "class": "Texture" },
          "media": [{ "kind": "TEXR", "path": "tex1.png" }]
        },
        {
          "kind": "set",
          "name": "lamps",
          "attributes": { "class": "Lighting" },
          "properties": [{ "name": "intensity", "value": { "int": 3 } }]
        },
        {
          "kind": "scene",
          "name": "hall",
          "attributes": { "class": "Hall" },
          "children": [
            {
              "kind": "group",
              "name": "squad",
              "attributes": { "class": "Squad", "header": "squad.h" },
              "children": [
                {
                  "kind": "actor",
                  "name": "hero",
                  "flags": 1,
                  "attributes": { "class": "Knight", "set": "lamps" },
                  "properties": [
                    { "name": "hp", "value": { "int": 100 } },
                    { "name": "skin", "value": { "media_ref": "tex1" } }
                  ],
                  "children": [
                    {
                      "kind": "role",
                      "name": "guard",
                      "attributes": { "class": "Guard" },
                      "properties": [{ "name": "radius", "value": { "int": 2 } }]
                    }
                  ]
                }
              ]
            }
          ]
        }
      ]
    }
"#};

pub fn castle() -> Workprint {
    Workprint::from_json(CASTLE).expect("castle fixture is valid")
}

pub fn castle_symbols() -> SymbolTable {
    scan(&castle(), &AttributeClassResolver)
}
