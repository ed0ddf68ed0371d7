use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use tjkt_groups::core::export;
use tjkt_groups::utils::validation::Validate;
use tjkt_groups::{
    ConfigProvider, DrawSettings, GroupEngine, JsonFileStore, MemoryStore, StateStore, TomlConfig,
};

#[tokio::test]
async fn test_end_to_end_roster_draw_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let state_path = temp_dir.path().join("site_state.json");

    let mut config_file = NamedTempFile::new().unwrap();
    let toml_content = format!(
        r#"
[class]
name = "X TJKT 2"

[storage]
state_path = "{}"

[draw]
default_group_size = 3
anchors = ["Rizky", "Nabila"]
"#,
        state_path.display()
    );
    config_file.write_all(toml_content.as_bytes()).unwrap();

    let config = TomlConfig::from_file(config_file.path()).unwrap();
    config.validate().unwrap();

    // First run: import the roster and save.
    let store = JsonFileStore::new(config.state_path());
    let mut engine = GroupEngine::with_seed(
        store.load().await.unwrap(),
        DrawSettings::from_config(&config),
        Some(2024),
    );
    let csv_data = "name,role\nRizky,Siswa\nNabila,Sekretaris\nAndi,\nSinta,Siswa\nPak Yusuf,Wali Kelas\nDimas,Siswa\n";
    let students = export::roster_from_csv(csv_data.as_bytes()).unwrap();
    assert_eq!(engine.import_roster(students), 6);
    store.save(engine.state()).await.unwrap();

    // Second run: draw a group from the reloaded state.
    let mut engine = GroupEngine::with_seed(
        store.load().await.unwrap(),
        DrawSettings::from_config(&config),
        Some(7),
    );
    assert_eq!(engine.compute_pool().len(), 5);

    let reserved = engine.start_session();
    let exit = *reserved.keys().last().unwrap();
    let group = engine.draw_group(exit + 1, "Kelompok Jaringan").unwrap();
    let member_names: Vec<&str> = group.members.iter().map(|m| m.name.as_str()).collect();
    assert!(member_names.contains(&"Rizky"));
    assert!(member_names.contains(&"Nabila"));
    store.save(engine.state()).await.unwrap();

    // Third run: the committed group survives the reload.
    let reloaded = store.load().await.unwrap();
    assert_eq!(reloaded.groups.len(), 1);
    assert_eq!(reloaded.groups[0], group);

    let engine = GroupEngine::with_seed(reloaded, DrawSettings::from_config(&config), None);
    assert_eq!(engine.compute_pool().len(), 5 - group.members.len());

    let csv_output = export::groups_to_csv(&engine.state().groups).unwrap();
    assert_eq!(csv_output.lines().count(), group.members.len() + 1);
    assert!(csv_output.contains("Kelompok Jaringan"));
}

#[tokio::test]
async fn test_memory_store_keeps_engine_state() {
    let store = MemoryStore::default();
    let mut engine = GroupEngine::with_seed(
        store.load().await.unwrap(),
        DrawSettings::default(),
        Some(1),
    );

    engine.add_student("Ayu", "").unwrap();
    engine.add_student("Bima", "").unwrap();
    engine.draw_group(2, "").unwrap();
    store.save(engine.state()).await.unwrap();

    let state = store.load().await.unwrap();
    assert_eq!(state.students.len(), 2);
    assert_eq!(state.groups[0].name, "Group 1");
}

#[test]
fn test_config_without_anchors_yields_plain_settings() {
    let config = TomlConfig::from_toml_str("[class]\nexempt_role = \"Guru\"\n").unwrap();
    let settings = DrawSettings::from_config(&config);

    assert_eq!(settings.exempt_role, "Guru");
    assert_eq!(settings.anchors, None);
    assert_eq!(config.exempt_role(), "Guru");
}
