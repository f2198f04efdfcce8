//! Static demo catalog served by the mock plugin
//!
//! Entries are kept in slices so listings follow declaration order.

use crate::catalog::{CatalogItem, Folder, Resource};
use crate::error::{CatalogError, Result};

#[derive(Debug)]
pub struct FolderEntry {
    pub id: &'static str,
    pub title: &'static str,
    /// `None` for root-level folders
    pub parent_id: Option<&'static str>,
}

#[derive(Debug)]
pub struct ResourceEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub format: &'static str,
    pub url: &'static str,
    pub mime_type: &'static str,
    pub size: u64,
    pub folder_id: Option<&'static str>,
}

impl FolderEntry {
    fn to_folder(&self) -> Folder {
        Folder::new(self.id, self.title)
    }
}

impl ResourceEntry {
    fn to_resource(&self) -> Resource {
        Resource {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: Some(self.description.to_string()),
            format: self.format.to_string(),
            mime_type: Some(self.mime_type.to_string()),
            size: Some(self.size),
            url: Some(self.url.to_string()),
            ..Default::default()
        }
    }
}

/// Read-only folder/resource table
#[derive(Debug)]
pub struct ResourceTree {
    pub folders: &'static [FolderEntry],
    pub resources: &'static [ResourceEntry],
}

impl ResourceTree {
    pub fn folder(&self, id: &str) -> Option<&FolderEntry> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn resource(&self, id: &str) -> Option<&ResourceEntry> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// Owned copy of a resource's metadata
    pub fn get_resource(&self, id: &str) -> Result<Resource> {
        self.resource(id)
            .map(ResourceEntry::to_resource)
            .ok_or_else(|| CatalogError::resource_not_found(id))
    }

    /// Direct children of `parent`, folders first, each group in table order.
    pub fn children(&self, parent: Option<&str>) -> Vec<CatalogItem> {
        let folders = self
            .folders
            .iter()
            .filter(|f| f.parent_id == parent)
            .map(|f| CatalogItem::Folder(f.to_folder()));

        let resources = self
            .resources
            .iter()
            .filter(|r| r.folder_id == parent)
            .map(|r| CatalogItem::Resource(r.to_resource()));

        folders.chain(resources).collect()
    }

    /// Folders from the root ancestor down to `folder_id` inclusive.
    ///
    /// Fails if `folder_id` or any ancestor is missing from the table.
    pub fn breadcrumb(&self, folder_id: &str) -> Result<Vec<Folder>> {
        let current = self
            .folder(folder_id)
            .ok_or_else(|| CatalogError::folder_not_found(folder_id))?;

        let mut path = vec![current.to_folder()];
        let mut parent_id = current.parent_id;

        while let Some(id) = parent_id {
            // Bounded by the table size so a parent cycle cannot spin forever
            if path.len() > self.folders.len() {
                return Err(CatalogError::folder_not_found(id));
            }
            let parent = self
                .folder(id)
                .ok_or_else(|| CatalogError::folder_not_found(id))?;
            path.insert(0, parent.to_folder());
            parent_id = parent.parent_id;
        }

        Ok(path)
    }
}

pub static TREE: ResourceTree = ResourceTree {
    folders: FOLDERS,
    resources: RESOURCES,
};

static FOLDERS: &[FolderEntry] = &[
    FolderEntry {
        id: "category-geospatial",
        title: "Données Géospatiales",
        parent_id: None,
    },
    FolderEntry {
        id: "subcategory-transport",
        title: "Transport",
        parent_id: Some("category-geospatial"),
    },
    FolderEntry {
        id: "category-economic",
        title: "Données Économiques",
        parent_id: Some("subcategory-transport"),
    },
    FolderEntry {
        id: "subcategory-boundaries",
        title: "Délimitations administratives",
        parent_id: Some("category-geospatial"),
    },
    FolderEntry {
        id: "category-demographic",
        title: "Données Démographiques",
        parent_id: None,
    },
];

static RESOURCES: &[ResourceEntry] = &[
    ResourceEntry {
        id: "category-geospatial/subcategory-transport/category-economic/resource-gdp-data",
        title: "PIB par région",
        description: "Produit intérieur brut par région française",
        format: "json",
        url: "https://example.com/gdp-data.json",
        mime_type: "application/json",
        size: 512_000,
        folder_id: Some("category-economic"),
    },
    ResourceEntry {
        id: "category-geospatial/subcategory-transport/resource-metro-stations",
        title: "Stations de métro Paris",
        description: "Liste complète des stations de métro parisien avec coordonnées",
        format: "geojson",
        url: "https://example.com/metro-stations.geojson",
        mime_type: "application/geo+json",
        size: 2_048_000,
        folder_id: Some("subcategory-transport"),
    },
    ResourceEntry {
        id: "category-geospatial/subcategory-transport/resource-bus-lines",
        title: "Lignes de bus Paris",
        description: "Tracés des lignes de bus avec horaires",
        format: "csv",
        url: "https://example.com/bus-lines.csv",
        mime_type: "text/csv",
        size: 1_024_000,
        folder_id: Some("subcategory-transport"),
    },
    ResourceEntry {
        id: "category-geospatial/subcategory-transport/resource-tram-lines",
        title: "Lignes de tramway Paris",
        description: "Tracés des lignes de tramway avec arrêts",
        format: "geojson",
        url: "https://example.com/tram-lines.geojson",
        mime_type: "application/geo+json",
        size: 1_536_000,
        folder_id: Some("subcategory-transport"),
    },
    ResourceEntry {
        id: "category-geospatial/subcategory-transport/resource-bike-stations",
        title: "Stations Vélib Paris",
        description: "Emplacements et disponibilités des stations Vélib",
        format: "json",
        url: "https://example.com/velib-stations.json",
        mime_type: "application/json",
        size: 512_000,
        folder_id: Some("subcategory-transport"),
    },
    ResourceEntry {
        id: "category-geospatial/subcategory-transport/resource-parking-lots",
        title: "Parkings publics Paris",
        description: "Localisation et capacité des parkings publics",
        format: "csv",
        url: "https://example.com/parking-lots.csv",
        mime_type: "text/csv",
        size: 768_000,
        folder_id: Some("subcategory-transport"),
    },
    ResourceEntry {
        id: "category-geospatial/subcategory-transport/resource-taxi-stations",
        title: "Stations de taxi Paris",
        description: "Emplacements des stations de taxi officielles",
        format: "geojson",
        url: "https://example.com/taxi-stations.geojson",
        mime_type: "application/geo+json",
        size: 256_000,
        folder_id: Some("subcategory-transport"),
    },
    ResourceEntry {
        id: "category-geospatial/subcategory-transport/resource-traffic-data",
        title: "Données de trafic temps réel",
        description: "Informations de trafic en temps réel sur les axes principaux",
        format: "json",
        url: "https://example.com/traffic-data.json",
        mime_type: "application/json",
        size: 2_048_000,
        folder_id: Some("subcategory-transport"),
    },
    ResourceEntry {
        id: "category-geospatial/subcategory-transport/resource-road-works",
        title: "Travaux de voirie Paris",
        description: "Informations sur les travaux en cours et à venir",
        format: "csv",
        url: "https://example.com/road-works.csv",
        mime_type: "text/csv",
        size: 384_000,
        folder_id: Some("subcategory-transport"),
    },
    ResourceEntry {
        id: "category-geospatial/subcategory-transport/resource-speed-limits",
        title: "Limitations de vitesse",
        description: "Cartographie des limitations de vitesse par rue",
        format: "shapefile",
        url: "https://example.com/speed-limits.zip",
        mime_type: "application/zip",
        size: 3_072_000,
        folder_id: Some("subcategory-transport"),
    },
    ResourceEntry {
        id: "category-geospatial/subcategory-transport/resource-pedestrian-zones",
        title: "Zones piétonnes Paris",
        description: "Délimitation des zones réservées aux piétons",
        format: "geojson",
        url: "https://example.com/pedestrian-zones.geojson",
        mime_type: "application/geo+json",
        size: 1_024_000,
        folder_id: Some("subcategory-transport"),
    },
    ResourceEntry {
        id: "category-geospatial/subcategory-transport/resource-cycle-lanes",
        title: "Pistes cyclables Paris",
        description: "Réseau des pistes cyclables et voies vertes",
        format: "geojson",
        url: "https://example.com/cycle-lanes.geojson",
        mime_type: "application/geo+json",
        size: 1_792_000,
        folder_id: Some("subcategory-transport"),
    },
    ResourceEntry {
        id: "category-geospatial/subcategory-transport/resource-public-transport-schedules",
        title: "Horaires transports publics",
        description: "Horaires théoriques des lignes de transport public",
        format: "gtfs",
        url: "https://example.com/schedules.zip",
        mime_type: "application/zip",
        size: 25_600_000,
        folder_id: Some("subcategory-transport"),
    },
    ResourceEntry {
        id: "category-geospatial/subcategory-boundaries/resource-communes",
        title: "Limites communales",
        description: "Délimitations des communes françaises",
        format: "shapefile",
        url: "https://example.com/communes.zip",
        mime_type: "application/zip",
        size: 15_360_000,
        folder_id: Some("subcategory-boundaries"),
    },
    ResourceEntry {
        id: "category-demographic/resource-population-2023",
        title: "Population par commune 2023",
        description: "Données démographiques détaillées par commune",
        format: "xlsx",
        url: "https://example.com/population-2023.xlsx",
        mime_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        size: 5_120_000,
        folder_id: Some("category-demographic"),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_children_are_the_two_root_folders() {
        let children = TREE.children(None);
        let ids: Vec<&str> = children.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["category-geospatial", "category-demographic"]);
        assert!(children.iter().all(CatalogItem::is_folder));
    }

    #[test]
    fn folders_come_before_resources() {
        let children = TREE.children(Some("subcategory-transport"));
        assert_eq!(children.len(), 13);
        assert!(children[0].is_folder());
        assert_eq!(children[0].id(), "category-economic");
        assert!(children[1..].iter().all(|c| !c.is_folder()));
        assert_eq!(
            children[1].id(),
            "category-geospatial/subcategory-transport/resource-metro-stations"
        );
    }

    #[test]
    fn breadcrumb_ends_with_folder_and_walks_ancestors() {
        for folder in TREE.folders {
            let path = TREE.breadcrumb(folder.id).unwrap();
            assert_eq!(path.last().map(|f| f.id.as_str()), Some(folder.id));

            // each element is the parent of the next
            for pair in path.windows(2) {
                let child = TREE.folder(&pair[1].id).unwrap();
                assert_eq!(child.parent_id, Some(pair[0].id.as_str()));
            }
            assert!(TREE.folder(&path[0].id).unwrap().parent_id.is_none());
        }
    }

    #[test]
    fn breadcrumb_of_deep_folder() {
        let ids: Vec<String> = TREE
            .breadcrumb("category-economic")
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "category-geospatial",
                "subcategory-transport",
                "category-economic"
            ]
        );
    }

    #[test]
    fn breadcrumb_of_unknown_folder_fails() {
        let err = TREE.breadcrumb("nope").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { ref id, .. } if id == "nope"));
    }

    static BROKEN_FOLDERS: &[FolderEntry] = &[FolderEntry {
        id: "orphan",
        title: "Orphan",
        parent_id: Some("missing-parent"),
    }];

    static CYCLIC_FOLDERS: &[FolderEntry] = &[
        FolderEntry {
            id: "a",
            title: "A",
            parent_id: Some("b"),
        },
        FolderEntry {
            id: "b",
            title: "B",
            parent_id: Some("a"),
        },
    ];

    #[test]
    fn breadcrumb_reports_missing_ancestor() {
        let tree = ResourceTree {
            folders: BROKEN_FOLDERS,
            resources: &[],
        };
        let err = tree.breadcrumb("orphan").unwrap_err();
        assert_eq!(err.to_string(), "Folder with ID missing-parent not found");
    }

    #[test]
    fn breadcrumb_terminates_on_cycle() {
        let tree = ResourceTree {
            folders: CYCLIC_FOLDERS,
            resources: &[],
        };
        assert!(tree.breadcrumb("a").is_err());
    }

    #[test]
    fn every_resource_resolves_to_itself() {
        for entry in TREE.resources {
            let resource = TREE.get_resource(entry.id).unwrap();
            assert_eq!(resource.id, entry.id);
            assert_eq!(resource.format, entry.format);
            assert!(resource.file_path.is_none());
        }
    }

    #[test]
    fn returned_copies_do_not_alias_the_table() {
        let mut first = TREE
            .get_resource("category-demographic/resource-population-2023")
            .unwrap();
        first.title.push_str(" (edited)");

        let second = TREE
            .get_resource("category-demographic/resource-population-2023")
            .unwrap();
        assert_eq!(second.title, "Population par commune 2023");
    }
}
